//! Frame-driven stat counters and the scroll gate that starts them.
//!
//! A counter advances once per frame by `target / speed`, rounded up, so it
//! takes about `speed` frames regardless of the target's size. Duration in
//! wall-clock time therefore follows the display refresh rate.

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;
use crate::inputs::ScrollSample;
use crate::outputs::{AnimationKind, Change, CoreEvent, Outputs};

/// Lifecycle of a run-once component, owned by whoever starts it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    #[default]
    Pending,
    Running,
    Done,
}

impl Completion {
    /// Move from Pending to Running. Returns false if it already left Pending.
    pub fn begin(&mut self) -> bool {
        if *self == Completion::Pending {
            *self = Completion::Running;
            true
        } else {
            false
        }
    }

    pub fn finish(&mut self) {
        *self = Completion::Done;
    }

    pub fn has_started(&self) -> bool {
        *self != Completion::Pending
    }
}

#[derive(Debug)]
pub struct CounterAnimator {
    element: ElementId,
    target: u64,
    increment: f64,
    shown: u64,
    suffix: &'static str,
    done: bool,
}

impl CounterAnimator {
    /// `percent_suffix` keeps a trailing `%` on every written value.
    pub fn new(element: ElementId, target: u64, speed: f64, percent_suffix: bool) -> Self {
        Self {
            element,
            target,
            increment: target as f64 / speed,
            shown: 0,
            suffix: if percent_suffix { "%" } else { "" },
            done: false,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn render(&self) -> String {
        format!("{}{}", self.shown, self.suffix)
    }

    /// Run one frame. Returns true once the target has been written.
    pub fn frame(&mut self, out: &mut Outputs) -> bool {
        if self.done {
            return true;
        }
        if self.shown < self.target {
            let next = (self.shown as f64 + self.increment).ceil();
            // ceil of a positive step always moves at least one unit
            let next = (next as u64).max(self.shown + 1);
            self.shown = next.min(self.target);
        }
        out.push_change(Change::text(self.element, self.render()));
        if self.shown >= self.target {
            self.done = true;
            out.push_event(CoreEvent::AnimationCompleted {
                element: self.element,
                kind: AnimationKind::Counter,
            });
        }
        self.done
    }
}

/// Opens once when a section's top rises above `viewport_height - offset`.
#[derive(Debug)]
pub struct ScrollGate {
    section: ElementId,
    offset_px: f64,
    state: Completion,
}

impl ScrollGate {
    pub fn new(section: ElementId, offset_px: f64) -> Self {
        Self {
            section,
            offset_px,
            state: Completion::Pending,
        }
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn state(&self) -> Completion {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut Completion {
        &mut self.state
    }

    /// True exactly once: on the first sample placing the section in range.
    pub fn check(&mut self, sample: &ScrollSample) -> bool {
        if self.state.has_started() {
            return false;
        }
        let Some(top) = sample
            .sections
            .iter()
            .find(|s| s.element == self.section)
            .map(|s| s.top)
        else {
            return false;
        };
        if top < sample.viewport_height - self.offset_px {
            self.state.begin()
        } else {
            false
        }
    }
}
