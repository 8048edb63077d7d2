//! Deferred chart rendering.
//!
//! The chart itself is drawn by an external library; this module only
//! describes it declaratively ([`ChartSpec`]) and makes sure the render
//! request for a container is issued once, when the container first
//! becomes visible.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::ids::ElementId;
use crate::outputs::{AnimationKind, ChartRender, CoreEvent, Outputs};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Pie,
    Bar,
    Line,
    Radar,
    #[serde(rename = "polarArea")]
    PolarArea,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub border_width: u32,
    pub border_color: String,
    pub hover_offset: u32,
    /// Inner radius for doughnuts, e.g. `"60%"`.
    #[serde(default)]
    pub cutout: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: u32,
    pub bold: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub position: String,
    pub color: String,
    pub font: Font,
    pub box_width: u32,
    pub padding: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub color: String,
    pub font: Font,
    pub padding_bottom: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub background: String,
    pub title_color: String,
    pub body_color: String,
    /// Appended to the value in tooltip labels (`"Python: 18.37%"`).
    pub value_suffix: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntroAnimation {
    pub rotate: bool,
    pub scale: bool,
    pub duration_ms: u32,
}

/// Declarative description handed to the charting library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub dataset: Dataset,
    pub legend: Legend,
    #[serde(default)]
    pub title: Option<Title>,
    pub tooltip: Tooltip,
    pub animation: IntroAnimation,
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
}

fn font_json(font: &Font) -> JsonValue {
    if font.bold {
        json!({ "size": font.size, "weight": "bold" })
    } else {
        json!({ "size": font.size })
    }
}

impl ChartSpec {
    /// Skill distribution doughnut shown in the skills section.
    pub fn skills_default() -> Self {
        let shares = [
            ("Python", 18.37, "#2ecc71"),
            ("SQL", 18.37, "#3498db"),
            ("Power BI / Tableau", 16.33, "#f1c40f"),
            ("Excel", 10.20, "#9b59b6"),
            ("HTML", 16.33, "#e67e22"),
            ("CSS", 6.12, "#1abc9c"),
            ("C#", 4.08, "#e74c3c"),
            ("JavaScript", 6.12, "#34495e"),
            ("PHP", 4.08, "#f39c12"),
        ];
        Self {
            kind: ChartKind::Doughnut,
            labels: shares.iter().map(|(l, _, _)| l.to_string()).collect(),
            dataset: Dataset {
                label: "Skill Level (%)".into(),
                values: shares.iter().map(|(_, v, _)| *v).collect(),
                colors: shares.iter().map(|(_, _, c)| c.to_string()).collect(),
                border_width: 2,
                border_color: "#0a0a0a".into(),
                hover_offset: 18,
                cutout: Some("60%".into()),
            },
            legend: Legend {
                position: "bottom".into(),
                color: "#fff".into(),
                font: Font {
                    size: 14,
                    bold: true,
                },
                box_width: 16,
                padding: 12,
            },
            title: Some(Title {
                text: "Data Analyst Skill Distribution".into(),
                color: "#fff".into(),
                font: Font {
                    size: 20,
                    bold: true,
                },
                padding_bottom: 20,
            }),
            tooltip: Tooltip {
                background: "#1f2937".into(),
                title_color: "#fff".into(),
                body_color: "#fff".into(),
                value_suffix: "%".into(),
            },
            animation: IntroAnimation {
                rotate: true,
                scale: true,
                duration_ms: 1500,
            },
            responsive: true,
            maintain_aspect_ratio: false,
        }
    }

    /// Tooltip line for one slice.
    pub fn tooltip_label(&self, label: &str, value: f64) -> String {
        format!("{label}: {value}{}", self.tooltip.value_suffix)
    }

    /// Chart.js configuration object. Tooltip label callbacks are functions and
    /// are attached by the host using [`ChartSpec::tooltip_label`].
    pub fn to_chartjs_config(&self) -> JsonValue {
        let mut dataset = json!({
            "label": self.dataset.label,
            "data": self.dataset.values,
            "backgroundColor": self.dataset.colors,
            "borderWidth": self.dataset.border_width,
            "borderColor": self.dataset.border_color,
            "hoverOffset": self.dataset.hover_offset,
        });
        if let Some(cutout) = &self.dataset.cutout {
            dataset["cutout"] = json!(cutout);
        }

        let title = match &self.title {
            Some(t) => json!({
                "display": true,
                "text": t.text,
                "color": t.color,
                "font": font_json(&t.font),
                "padding": { "bottom": t.padding_bottom },
            }),
            None => json!({ "display": false }),
        };

        json!({
            "type": self.kind,
            "data": {
                "labels": self.labels,
                "datasets": [dataset],
            },
            "options": {
                "responsive": self.responsive,
                "maintainAspectRatio": self.maintain_aspect_ratio,
                "plugins": {
                    "legend": {
                        "position": self.legend.position,
                        "labels": {
                            "color": self.legend.color,
                            "font": font_json(&self.legend.font),
                            "boxWidth": self.legend.box_width,
                            "padding": self.legend.padding,
                        },
                    },
                    "title": title,
                    "tooltip": {
                        "backgroundColor": self.tooltip.background,
                        "titleColor": self.tooltip.title_color,
                        "bodyColor": self.tooltip.body_color,
                    },
                },
                "animation": {
                    "animateRotate": self.animation.rotate,
                    "animateScale": self.animation.scale,
                    "duration": self.animation.duration_ms,
                },
            },
        })
    }
}

/// Issues the render request for one container, once.
#[derive(Debug)]
pub struct ChartBootstrap {
    container: ElementId,
    canvas: ElementId,
    spec: ChartSpec,
    rendered: bool,
}

impl ChartBootstrap {
    pub fn new(container: ElementId, canvas: ElementId, spec: ChartSpec) -> Self {
        if spec.labels.len() != spec.dataset.values.len() {
            log::warn!(
                "chart for {:?} has {} labels but {} values",
                container,
                spec.labels.len(),
                spec.dataset.values.len()
            );
        }
        Self {
            container,
            canvas,
            spec,
            rendered: false,
        }
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn canvas(&self) -> ElementId {
        self.canvas
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn render(&mut self, out: &mut Outputs) {
        if self.rendered {
            return;
        }
        self.rendered = true;
        out.charts.push(ChartRender {
            container: self.container,
            canvas: self.canvas,
            spec: self.spec.clone(),
        });
        out.push_event(CoreEvent::AnimationStarted {
            element: self.container,
            kind: AnimationKind::Chart,
        });
    }
}
