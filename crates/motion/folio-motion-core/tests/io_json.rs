use folio_motion_core::{
    Config, ElementId, Inputs, Outputs, PageLayout, PointerSample, Property, Stage,
};
use serde_json::json;

#[test]
fn layout_parses_from_host_json() {
    let layout: PageLayout = serde_json::from_value(json!({
        "typer": { "element": 0, "phrases": "[\"Analyst\",\"Engineer\"]" },
        "reveals": [1, 2],
        "skill_cards": [
            { "card": 3, "bar": 4, "label": 5, "percent": "80" },
            { "card": 6 }
        ],
        "counters": {
            "section": 7,
            "counters": [{ "element": 8, "target": "120", "text": "0" }]
        },
        "chart": { "container": 9 },
        "back_to_top": 10
    }))
    .unwrap();

    assert_eq!(layout.reveals, vec![ElementId(1), ElementId(2)]);
    assert_eq!(layout.skill_cards[1].bar, None);
    let chart = layout.chart.as_ref().unwrap();
    assert!(chart.spec.is_none());
    assert_eq!(chart.canvas, None);
    assert!(layout.tilt_cards.is_empty());

    let stage = Stage::new(Config::default(), layout).unwrap();
    assert_eq!(stage.skill_card_count(), 1);
    assert_eq!(stage.counter_section(), Some(ElementId(7)));
}

#[test]
fn inputs_parse_with_missing_fields() {
    let inputs: Inputs = serde_json::from_value(json!({})).unwrap();
    assert!(inputs.visibility.is_empty());
    assert!(inputs.scroll.is_none());

    let inputs: Inputs = serde_json::from_value(json!({
        "visibility": [{ "element": 3, "ratio": 0.4, "is_intersecting": true }],
        "scroll": { "scroll_y": 420.0, "viewport_height": 900.0 },
        "pointer": [{ "Leave": { "card": 12 } }]
    }))
    .unwrap();
    assert_eq!(inputs.visibility[0].element, ElementId(3));
    assert!(inputs.scroll.as_ref().unwrap().sections.is_empty());
    assert_eq!(inputs.pointer[0], PointerSample::Leave { card: ElementId(12) });
}

#[test]
fn outputs_serialize_for_the_host() {
    let layout = PageLayout {
        back_to_top: Some(ElementId(2)),
        ..PageLayout::default()
    };
    let mut stage = Stage::new(Config::default(), layout).unwrap();
    let inputs: Inputs = serde_json::from_value(json!({
        "scroll": { "scroll_y": 800.0, "viewport_height": 900.0 }
    }))
    .unwrap();
    let out = stage.update(16.0, inputs);
    assert_eq!(out.changes[0].property, Property::Opacity);

    let v = serde_json::to_value(out).unwrap();
    assert_eq!(
        v,
        json!({
            "changes": [{ "element": 2, "property": "Opacity", "value": "1" }],
            "charts": [],
            "events": []
        })
    );

    let back: Outputs = serde_json::from_value(v).unwrap();
    assert_eq!(back.changes.len(), 1);
}

#[test]
fn config_round_trips_through_json() {
    let cfg: Config = serde_json::from_value(json!({
        "type_delay_ms": 70.0,
        "tilt": { "yaw_deg": -12.0 }
    }))
    .unwrap();
    assert_eq!(cfg.type_delay_ms, 70.0);
    assert_eq!(cfg.tilt.yaw_deg, -12.0);
    assert_eq!(cfg.tilt.pitch_deg, 6.0);
    assert!(cfg.validate().is_ok());
}
