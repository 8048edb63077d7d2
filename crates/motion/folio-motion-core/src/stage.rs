//! Stage: the composition root that wires page elements to animators.
//!
//! Setup reads a [`PageLayout`] once: which elements exist and the raw
//! declarative attributes they carry. Missing elements leave their component
//! unwired; malformed attributes fall back to defaults with a warning.
//!
//! Per frame, [`Stage::update`] first advances animators started on earlier
//! frames, then applies the frame's observations (visibility records,
//! scroll, pointer), which may start new animators. Every run-once component
//! keeps its own [`Completion`] here instead of in free-floating flags.

use serde::{Deserialize, Serialize};

use crate::chart::{ChartBootstrap, ChartSpec};
use crate::config::Config;
use crate::counter::{Completion, CounterAnimator, ScrollGate};
use crate::error::ConfigError;
use crate::ids::ElementId;
use crate::inputs::{Inputs, PointerSample, ScrollSample, VisibilityEntry};
use crate::outputs::{AnimationKind, Change, CoreEvent, Outputs, Property};
use crate::params::{has_percent_suffix, parse_counter_target, parse_percent, parse_phrases};
use crate::progress::ProgressAnimator;
use crate::tilt::tilt_transform;
use crate::typer::{started_event, Typer, TyperTiming};
use crate::visibility::{ObserveOptions, VisibilityTrigger};

/// Class added to reveal elements when they scroll into view.
pub const REVEAL_CLASS: &str = "show";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TyperTarget {
    pub element: ElementId,
    /// Raw `data-phrases` value (JSON array of strings).
    #[serde(default)]
    pub phrases: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkillCard {
    pub card: ElementId,
    #[serde(default)]
    pub bar: Option<ElementId>,
    #[serde(default)]
    pub label: Option<ElementId>,
    /// Raw `data-percent` value of the bar.
    #[serde(default)]
    pub percent: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CounterTarget {
    pub element: ElementId,
    /// Raw `data-target` value.
    #[serde(default)]
    pub target: Option<String>,
    /// Text displayed before animation; a `%` in it is kept as a suffix.
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CounterSection {
    pub section: ElementId,
    #[serde(default)]
    pub counters: Vec<CounterTarget>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChartTarget {
    /// Element watched for visibility.
    pub container: ElementId,
    /// Drawing surface; the container itself when absent.
    #[serde(default)]
    pub canvas: Option<ElementId>,
    /// Defaults to [`ChartSpec::skills_default`].
    #[serde(default)]
    pub spec: Option<ChartSpec>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TiltCard {
    pub card: ElementId,
    /// Element receiving the transform.
    pub inner: ElementId,
}

/// Everything the stage needs to know about the page, gathered once by the host.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PageLayout {
    #[serde(default)]
    pub typer: Option<TyperTarget>,
    #[serde(default)]
    pub reveals: Vec<ElementId>,
    #[serde(default)]
    pub skill_cards: Vec<SkillCard>,
    #[serde(default)]
    pub counters: Option<CounterSection>,
    #[serde(default)]
    pub chart: Option<ChartTarget>,
    #[serde(default)]
    pub back_to_top: Option<ElementId>,
    #[serde(default)]
    pub tilt_cards: Vec<TiltCard>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Reveal,
    SkillCard(usize),
    Chart,
}

#[derive(Debug)]
struct CardSlot {
    bar: ElementId,
    label: ElementId,
    target: u8,
    state: Completion,
    animator: Option<ProgressAnimator>,
}

#[derive(Debug)]
struct CounterGroup {
    gate: ScrollGate,
    /// (element, target, keep `%`)
    targets: Vec<(ElementId, u64, bool)>,
    running: Vec<CounterAnimator>,
}

#[derive(Debug)]
struct BackToTop {
    element: ElementId,
    shown: Option<bool>,
}

#[derive(Debug)]
pub struct Stage {
    cfg: Config,
    trigger: VisibilityTrigger<Action>,
    typer: Option<Typer>,
    cards: Vec<CardSlot>,
    counters: Option<CounterGroup>,
    chart: Option<ChartBootstrap>,
    back_to_top: Option<BackToTop>,
    tilt_cards: Vec<TiltCard>,

    // Per-frame outputs
    outputs: Outputs,
    pending_events: Vec<CoreEvent>,
    released: Vec<ElementId>,
}

impl Stage {
    /// Validate `cfg` and wire every component present in `layout`.
    pub fn new(cfg: Config, layout: PageLayout) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut stage = Self {
            cfg,
            trigger: VisibilityTrigger::new(),
            typer: None,
            cards: Vec::new(),
            counters: None,
            chart: None,
            back_to_top: None,
            tilt_cards: Vec::new(),
            outputs: Outputs::default(),
            pending_events: Vec::new(),
            released: Vec::new(),
        };
        stage.wire(layout);
        Ok(stage)
    }

    fn wire(&mut self, layout: PageLayout) {
        if let Some(target) = layout.typer {
            let phrases = parse_phrases(target.phrases.as_deref()).unwrap_or_else(|e| {
                log::warn!("typer {:?}: {e}; leaving it blank", target.element);
                Vec::new()
            });
            self.typer = Typer::start(
                target.element,
                phrases,
                TyperTiming::from_config(&self.cfg),
                self.cfg.jitter_seed,
            );
            match &self.typer {
                Some(typer) => self.pending_events.push(started_event(typer)),
                None => log::debug!("typer {:?} has no phrases", target.element),
            }
        }

        for element in layout.reveals {
            self.trigger.observe(
                element,
                Action::Reveal,
                ObserveOptions::repeat(self.cfg.reveal_threshold),
            );
        }

        for card in layout.skill_cards {
            let (Some(bar), Some(label)) = (card.bar, card.label) else {
                log::warn!("skill card {:?} lacks a bar or label; skipped", card.card);
                continue;
            };
            let target = parse_percent(card.percent.as_deref()).unwrap_or_else(|e| {
                log::warn!("skill card {:?}: {e}; using 0", card.card);
                0
            });
            let index = self.cards.len();
            self.cards.push(CardSlot {
                bar,
                label,
                target,
                state: Completion::Pending,
                animator: None,
            });
            self.trigger.observe(
                card.card,
                Action::SkillCard(index),
                ObserveOptions::once(self.cfg.card_threshold),
            );
        }

        if let Some(section) = layout.counters {
            let targets = section
                .counters
                .into_iter()
                .map(|c| {
                    let target = parse_counter_target(c.target.as_deref()).unwrap_or_else(|e| {
                        log::warn!("counter {:?}: {e}; using 0", c.element);
                        0
                    });
                    (c.element, target, has_percent_suffix(&c.text))
                })
                .collect();
            self.counters = Some(CounterGroup {
                gate: ScrollGate::new(section.section, self.cfg.counter_section_offset_px),
                targets,
                running: Vec::new(),
            });
        }

        if let Some(chart) = layout.chart {
            let spec = chart.spec.unwrap_or_else(ChartSpec::skills_default);
            let canvas = chart.canvas.unwrap_or(chart.container);
            self.chart = Some(ChartBootstrap::new(chart.container, canvas, spec));
            self.trigger.observe(
                chart.container,
                Action::Chart,
                ObserveOptions::once(self.cfg.chart_threshold),
            );
        }

        self.back_to_top = layout.back_to_top.map(|element| BackToTop {
            element,
            shown: None,
        });
        self.tilt_cards = layout.tilt_cards;
    }

    /// Step one frame of `dt_ms` with the observations gathered since the last frame.
    pub fn update(&mut self, dt_ms: f64, inputs: Inputs) -> &Outputs {
        self.outputs.clear();
        self.outputs.events.append(&mut self.pending_events);
        let dt = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, self.cfg.max_frame_dt_ms)
        } else {
            0.0
        };

        self.advance_running(dt);

        if !inputs.visibility.is_empty() {
            self.apply_visibility(&inputs.visibility);
        }
        if let Some(scroll) = &inputs.scroll {
            self.apply_scroll(scroll);
        }
        for sample in &inputs.pointer {
            self.apply_pointer(sample);
        }

        &self.outputs
    }

    fn advance_running(&mut self, dt: f64) {
        if let Some(typer) = self.typer.as_mut() {
            typer.advance(dt, &mut self.outputs);
        }

        for slot in self.cards.iter_mut() {
            let Some(anim) = slot.animator.as_mut() else {
                continue;
            };
            anim.advance(dt, &mut self.outputs);
            if anim.is_finished() {
                slot.state.finish();
                slot.animator = None;
            }
        }

        self.step_counters();
    }

    /// One frame for every running counter; closes the gate when all are done.
    fn step_counters(&mut self) {
        let Some(group) = self.counters.as_mut() else {
            return;
        };
        if group.running.is_empty() {
            return;
        }
        for counter in group.running.iter_mut() {
            counter.frame(&mut self.outputs);
        }
        group.running.retain(|c| !c.is_done());
        if group.running.is_empty() {
            log::debug!("counters in {:?} finished", group.gate.section());
            group.gate.state_mut().finish();
        }
    }

    fn apply_visibility(&mut self, entries: &[VisibilityEntry]) {
        self.released.clear();
        let fired = self.trigger.process(entries, &mut self.released);
        for f in fired {
            log::debug!("{:?} fired for {:?}", f.action, f.element);
            self.outputs.push_event(CoreEvent::TriggerFired {
                subscription: f.subscription,
                element: f.element,
            });
            match f.action {
                Action::Reveal => self.outputs.push_change(Change {
                    element: f.element,
                    property: Property::AddClass,
                    value: REVEAL_CLASS.to_string(),
                }),
                Action::SkillCard(index) => self.start_progress(index),
                Action::Chart => {
                    if let Some(chart) = self.chart.as_mut() {
                        chart.render(&mut self.outputs);
                    }
                }
            }
        }
        for element in self.released.drain(..) {
            self.outputs.push_event(CoreEvent::Unobserved { element });
        }
    }

    fn start_progress(&mut self, index: usize) {
        let Some(slot) = self.cards.get_mut(index) else {
            return;
        };
        if !slot.state.begin() {
            return;
        }
        slot.animator = Some(ProgressAnimator::start(
            slot.bar,
            slot.label,
            slot.target,
            &self.cfg,
            &mut self.outputs,
        ));
    }

    fn apply_scroll(&mut self, scroll: &ScrollSample) {
        if let Some(btn) = self.back_to_top.as_mut() {
            let show = scroll.scroll_y > self.cfg.back_to_top_after_px;
            if btn.shown != Some(show) {
                btn.shown = Some(show);
                self.outputs.push_change(Change {
                    element: btn.element,
                    property: Property::Opacity,
                    value: if show { "1" } else { "0" }.to_string(),
                });
            }
        }

        let speed = self.cfg.counter_speed;
        let Some(group) = self.counters.as_mut() else {
            return;
        };
        if !group.gate.check(scroll) {
            return;
        }
        log::debug!("counter section {:?} in range", group.gate.section());
        group.running = group
            .targets
            .iter()
            .map(|&(element, target, suffix)| {
                self.outputs.push_event(CoreEvent::AnimationStarted {
                    element,
                    kind: AnimationKind::Counter,
                });
                CounterAnimator::new(element, target, speed, suffix)
            })
            .collect();
        if group.running.is_empty() {
            group.gate.state_mut().finish();
            return;
        }
        // first frame runs synchronously with the trigger
        self.step_counters();
    }

    fn apply_pointer(&mut self, sample: &PointerSample) {
        let Some(tilt) = self.tilt_cards.iter().find(|t| t.card == sample.card()) else {
            return;
        };
        let value = match sample {
            PointerSample::Move {
                client_x,
                client_y,
                rect,
                ..
            } => match tilt_transform(&self.cfg.tilt, *client_x, *client_y, rect) {
                Some(t) => t,
                None => return,
            },
            PointerSample::Leave { .. } => String::new(),
        };
        self.outputs.push_change(Change {
            element: tilt.inner,
            property: Property::Transform,
            value,
        });
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Outputs of the most recent update.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn typer(&self) -> Option<&Typer> {
        self.typer.as_ref()
    }

    /// Elements the host must observe for intersection.
    pub fn observed_elements(&self) -> Vec<ElementId> {
        self.trigger.observed_elements()
    }

    /// Thresholds the host observer must report crossings for.
    pub fn thresholds(&self) -> Vec<f32> {
        self.trigger.thresholds()
    }

    /// Section whose bounding top must be included in scroll samples.
    pub fn counter_section(&self) -> Option<ElementId> {
        self.counters.as_ref().map(|g| g.gate.section())
    }

    /// Number of wired skill cards (cards lacking a bar or label are not counted).
    pub fn skill_card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn progress_state(&self, index: usize) -> Option<Completion> {
        self.cards.get(index).map(|s| s.state)
    }

    pub fn counter_state(&self) -> Option<Completion> {
        self.counters.as_ref().map(|g| g.gate.state())
    }

    pub fn chart_rendered(&self) -> bool {
        self.chart.as_ref().is_some_and(ChartBootstrap::is_rendered)
    }
}
