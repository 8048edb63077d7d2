use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use folio_motion_core::{Config, Inputs, Outputs, PageLayout, Stage};

mod dom;
mod driver;
mod logger;

pub use driver::mount;

#[wasm_bindgen]
pub struct FolioMotion {
    core: Stage,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

pub(crate) fn config_from_js(config: JsValue) -> Result<Config, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(Config::default());
    }
    swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))
}

#[wasm_bindgen]
impl FolioMotion {
    /// Create a stage for a host-described page.
    /// `config` may be undefined/null for defaults; `layout` is a PageLayout object.
    /// Example:
    ///   new FolioMotion({ type_delay_ms: 40 }, { typer: { element: 0, phrases: '["Analyst"]' } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, layout: JsValue) -> Result<FolioMotion, JsError> {
        console_error_panic_hook::set_once();

        let cfg = config_from_js(config)?;
        let layout: PageLayout = if jsvalue_is_undefined_or_null(&layout) {
            PageLayout::default()
        } else {
            swb::from_value(layout).map_err(|e| JsError::new(&format!("layout error: {e}")))?
        };
        let core =
            Stage::new(cfg, layout).map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(FolioMotion { core })
    }

    /// Step by dt (milliseconds) with the observations gathered since the last call.
    /// Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f64, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out: &Outputs = self.core.update(dt_ms, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Element ids the host must feed visibility records for.
    #[wasm_bindgen(js_name = observed_elements)]
    pub fn observed_elements(&self) -> Vec<u32> {
        self.core.observed_elements().into_iter().map(|e| e.0).collect()
    }

    /// Thresholds to pass to the host's intersection observer.
    #[wasm_bindgen]
    pub fn thresholds(&self) -> Vec<f32> {
        self.core.thresholds()
    }

    /// Section whose top must be reported in scroll samples, if counters are wired.
    #[wasm_bindgen(js_name = counter_section)]
    pub fn counter_section(&self) -> Option<u32> {
        self.core.counter_section().map(|e| e.0)
    }

    #[wasm_bindgen(js_name = typer_text)]
    pub fn typer_text(&self) -> Option<String> {
        self.core.typer().map(|t| t.text().to_string())
    }
}

/// Enable console logging at the named level ("error", "warn", "info", "debug", "trace", "off").
#[wasm_bindgen(js_name = set_log_level)]
pub fn set_log_level(level: Option<String>) {
    logger::init(logger::parse_level(level.as_deref()));
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
