#![cfg(target_arch = "wasm32")]
use folio_motion_wasm::{abi_version, FolioMotion};
use serde::Serialize;
use serde_json::{json, Value};
use serde_wasm_bindgen as swb;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

// Plain JS objects, the way a host page would build them.
fn js(v: Value) -> JsValue {
    v.serialize(&swb::Serializer::json_compatible()).unwrap()
}

fn layout_json() -> JsValue {
    js(json!({
        "typer": { "element": 0, "phrases": "[\"Analyst\"]" },
        "skill_cards": [{ "card": 1, "bar": 2, "label": 3, "percent": "40" }],
        "chart": { "container": 4 },
        "back_to_top": 5
    }))
}

fn outputs(eng: &mut FolioMotion, dt: f64, inputs: Value) -> Value {
    let out = eng.update(dt, js(inputs)).unwrap();
    swb::from_value(out).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    assert!(FolioMotion::new(JsValue::UNDEFINED, JsValue::NULL).is_ok());
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    let cfg = js(json!({ "reveal_threshold": 2.0 }));
    assert!(FolioMotion::new(cfg, JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn observer_setup_is_exposed() {
    let eng = FolioMotion::new(JsValue::UNDEFINED, layout_json()).unwrap();
    assert_eq!(eng.observed_elements(), vec![1, 4]);
    assert_eq!(eng.thresholds(), vec![0.3]);
    assert_eq!(eng.counter_section(), None);
}

#[wasm_bindgen_test]
fn typer_writes_on_first_update() {
    let mut eng = FolioMotion::new(JsValue::UNDEFINED, layout_json()).unwrap();
    let out = outputs(&mut eng, 0.0, json!({}));
    assert_eq!(out["changes"][0]["element"].as_f64(), Some(0.0));
    assert_eq!(out["changes"][0]["value"], "A");
    assert_eq!(eng.typer_text().as_deref(), Some("A"));
}

#[wasm_bindgen_test]
fn visibility_starts_progress_and_chart() {
    let mut eng = FolioMotion::new(JsValue::UNDEFINED, layout_json()).unwrap();
    outputs(&mut eng, 0.0, json!({}));
    let out = outputs(
        &mut eng,
        16.0,
        json!({
            "visibility": [
                { "element": 1, "ratio": 0.5, "is_intersecting": true },
                { "element": 4, "ratio": 0.9, "is_intersecting": true }
            ]
        }),
    );
    let changes = out["changes"].as_array().unwrap();
    assert!(changes.iter().any(|c| c["element"].as_f64() == Some(2.0)
        && c["property"] == "Width"
        && c["value"] == "0%"));
    assert_eq!(out["charts"].as_array().unwrap().len(), 1);
    assert_eq!(out["charts"][0]["spec"]["kind"], "doughnut");
}

#[wasm_bindgen_test]
fn bad_inputs_are_reported() {
    let mut eng = FolioMotion::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    let bad = js(json!({ "visibility": "nope" }));
    assert!(eng.update(16.0, bad).is_err());
}
