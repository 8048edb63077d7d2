//! DOM scanning and output application for the browser driver.

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use folio_motion_core::{
    ChartRender, ChartTarget, CounterSection, CounterTarget, ElementId, IdAllocator, Outputs,
    PageLayout, Property, SkillCard, TiltCard, TyperTarget,
};

/// Maps core ElementIds to live DOM elements. An element registered twice keeps one id.
#[derive(Default)]
pub struct ElementRegistry {
    ids: IdAllocator,
    elements: Vec<Element>,
}

impl ElementRegistry {
    pub fn register(&mut self, el: Element) -> ElementId {
        if let Some(id) = self.id_of(&el) {
            return id;
        }
        let id = self.ids.alloc_element();
        self.elements.push(el);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    pub fn id_of(&self, el: &Element) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e == el)
            .map(|i| ElementId(i as u32))
    }
}

fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Collect every animatable element on the page into a layout.
pub fn scan_page(doc: &Document, registry: &mut ElementRegistry) -> PageLayout {
    let mut layout = PageLayout::default();

    if let Ok(Some(el)) = doc.query_selector(".typing") {
        let phrases = el.get_attribute("data-phrases");
        layout.typer = Some(TyperTarget {
            element: registry.register(el),
            phrases,
        });
    }

    layout.reveals = query_all(doc, ".reveal")
        .into_iter()
        .map(|el| registry.register(el))
        .collect();

    for card in query_all(doc, ".skill-card") {
        let bar = query_in(&card, ".progress-bar");
        let label = query_in(&card, ".percent");
        let percent = bar.as_ref().and_then(|b| b.get_attribute("data-percent"));
        layout.skill_cards.push(SkillCard {
            card: registry.register(card),
            bar: bar.map(|b| registry.register(b)),
            label: label.map(|l| registry.register(l)),
            percent,
        });
    }

    if let Ok(Some(about)) = doc.query_selector("#about") {
        let counters = query_all(doc, ".stat-value")
            .into_iter()
            .map(|el| CounterTarget {
                target: el.get_attribute("data-target"),
                text: el.text_content().unwrap_or_default(),
                element: registry.register(el),
            })
            .collect();
        layout.counters = Some(CounterSection {
            section: registry.register(about),
            counters,
        });
    }

    // the chart needs both the watched section and its canvas
    if let (Ok(Some(section)), Ok(Some(canvas))) = (
        doc.query_selector("#skills"),
        doc.query_selector("#skillsChart"),
    ) {
        layout.chart = Some(ChartTarget {
            container: registry.register(section),
            canvas: Some(registry.register(canvas)),
            spec: None,
        });
    }

    if let Ok(Some(btn)) = doc.query_selector("#backTop") {
        layout.back_to_top = Some(registry.register(btn));
    }

    for card in query_all(doc, ".project-card") {
        if let Some(inner) = query_in(&card, ".pc-inner") {
            layout.tilt_cards.push(TiltCard {
                card: registry.register(card),
                inner: registry.register(inner),
            });
        }
    }

    layout
}

fn set_style(el: &Element, name: &str, value: &str) {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    if let Err(e) = html.style().set_property(name, value) {
        log::warn!("set {name} failed: {e:?}");
    }
}

/// Write one frame of changes to the DOM and issue chart renders.
pub fn apply_outputs(registry: &ElementRegistry, outputs: &Outputs) {
    for change in &outputs.changes {
        let Some(el) = registry.get(change.element) else {
            continue;
        };
        match change.property {
            Property::Text => el.set_text_content(Some(&change.value)),
            Property::Width => set_style(el, "width", &change.value),
            Property::Opacity => set_style(el, "opacity", &change.value),
            Property::Transform => set_style(el, "transform", &change.value),
            Property::AddClass => {
                if let Err(e) = el.class_list().add_1(&change.value) {
                    log::warn!("class add failed: {e:?}");
                }
            }
        }
    }

    for render in &outputs.charts {
        if let Err(e) = render_chart(registry, render) {
            log::error!("chart render failed: {e:?}");
        }
    }
}

/// Hand the chart spec to the global `Chart` constructor.
fn render_chart(registry: &ElementRegistry, render: &ChartRender) -> Result<(), JsValue> {
    let canvas = registry
        .get(render.canvas)
        .ok_or_else(|| JsValue::from_str("chart canvas is not registered"))?;
    let ctor = Reflect::get(&js_sys::global(), &JsValue::from_str("Chart"))?;
    let ctor: Function = ctor
        .dyn_into()
        .map_err(|_| JsValue::from_str("Chart library is not loaded"))?;

    let config = render
        .spec
        .to_chartjs_config()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)?;

    // tooltip labels are formatted on the Rust side
    let spec = render.spec.clone();
    let label_cb = Closure::wrap(Box::new(move |ctx: JsValue| -> String {
        let label = Reflect::get(&ctx, &JsValue::from_str("label"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let value = Reflect::get(&ctx, &JsValue::from_str("parsed"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or_default();
        spec.tooltip_label(&label, value)
    }) as Box<dyn FnMut(JsValue) -> String>);
    let tooltip = Reflect::get(&config, &JsValue::from_str("options"))
        .and_then(|o| Reflect::get(&o, &JsValue::from_str("plugins")))
        .and_then(|p| Reflect::get(&p, &JsValue::from_str("tooltip")))?;
    let callbacks = js_sys::Object::new();
    Reflect::set(&callbacks, &JsValue::from_str("label"), label_cb.as_ref())?;
    Reflect::set(&tooltip, &JsValue::from_str("callbacks"), &callbacks)?;
    // the chart keeps calling the label callback for the page's lifetime
    label_cb.forget();

    Reflect::construct(&ctor, &Array::of2(canvas, &config))?;
    log::debug!("chart rendered into {:?}", render.canvas);
    Ok(())
}
