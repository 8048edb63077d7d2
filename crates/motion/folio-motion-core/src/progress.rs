//! Progress bar with a percentage label.
//!
//! Two independent processes run from the same start: a delayed write of
//! the bar's target width (the visual sweep is a CSS transition on the host)
//! and a fixed-interval label counter that climbs from 0% to the target one
//! percent per tick. They share a target but no clock.

use crate::config::Config;
use crate::ids::ElementId;
use crate::outputs::{AnimationKind, Change, CoreEvent, Outputs};
use crate::timer::{Interval, Timeout};

#[derive(Debug)]
pub struct ProgressAnimator {
    bar: ElementId,
    label: ElementId,
    target: u8,
    shown: u8,
    /// Pending width write; None once the target width is set.
    bar_delay: Option<Timeout>,
    ticker: Option<Interval>,
    completed: bool,
}

fn percent(n: u8) -> String {
    format!("{n}%")
}

impl ProgressAnimator {
    /// Reset bar and label to 0% and start both processes.
    pub fn start(
        bar: ElementId,
        label: ElementId,
        target: u8,
        cfg: &Config,
        out: &mut Outputs,
    ) -> Self {
        let target = target.min(100);
        out.push_change(Change::width(bar, percent(0)));
        out.push_change(Change::text(label, percent(0)));
        out.push_event(CoreEvent::AnimationStarted {
            element: bar,
            kind: AnimationKind::Progress,
        });
        Self {
            bar,
            label,
            target,
            shown: 0,
            bar_delay: Some(Timeout::new(cfg.progress_bar_delay_ms)),
            ticker: Some(Interval::new(cfg.progress_tick_ms)),
            completed: false,
        }
    }

    pub fn bar(&self) -> ElementId {
        self.bar
    }

    pub fn label(&self) -> ElementId {
        self.label
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Percentage currently written to the label.
    pub fn shown(&self) -> u8 {
        self.shown
    }

    pub fn is_finished(&self) -> bool {
        self.bar_delay.is_none() && self.ticker.is_none()
    }

    pub fn advance(&mut self, dt_ms: f64, out: &mut Outputs) {
        if let Some(delay) = self.bar_delay.as_mut() {
            if delay.advance(dt_ms).is_some() {
                out.push_change(Change::width(self.bar, percent(self.target)));
                self.bar_delay = None;
            }
        }

        if let Some(ticker) = self.ticker.as_mut() {
            for _ in 0..ticker.advance(dt_ms) {
                if self.shown < self.target {
                    self.shown += 1;
                    out.push_change(Change::text(self.label, percent(self.shown)));
                } else {
                    // first tick that finds the label at target stops the interval
                    self.ticker = None;
                    break;
                }
            }
        }

        if self.is_finished() && !self.completed {
            self.completed = true;
            log::debug!("progress {:?} reached {}%", self.bar, self.target);
            out.push_event(CoreEvent::AnimationCompleted {
                element: self.bar,
                kind: AnimationKind::Progress,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_resets_both_elements() {
        let mut out = Outputs::default();
        ProgressAnimator::start(ElementId(0), ElementId(1), 75, &Config::default(), &mut out);
        assert_eq!(
            &out.changes[..2],
            &[
                Change::width(ElementId(0), "0%"),
                Change::text(ElementId(1), "0%")
            ]
        );
    }

    #[test]
    fn bar_width_waits_for_delay() {
        let mut out = Outputs::default();
        let mut p =
            ProgressAnimator::start(ElementId(0), ElementId(1), 40, &Config::default(), &mut out);
        out.clear();
        p.advance(149.0, &mut out);
        assert_eq!(out.last_value(ElementId(0), crate::Property::Width), None);
        p.advance(1.0, &mut out);
        assert_eq!(
            out.last_value(ElementId(0), crate::Property::Width),
            Some("40%")
        );
    }

    #[test]
    fn label_climbs_one_per_tick_and_stops() {
        let mut out = Outputs::default();
        let mut p =
            ProgressAnimator::start(ElementId(0), ElementId(1), 3, &Config::default(), &mut out);
        out.clear();
        p.advance(15.0, &mut out);
        assert_eq!(p.shown(), 1);
        p.advance(30.0, &mut out);
        assert_eq!(p.shown(), 3);
        assert!(!p.is_finished());
        p.advance(200.0, &mut out);
        assert_eq!(p.shown(), 3);
        assert!(p.is_finished());
        let labels: Vec<&str> = out
            .changes
            .iter()
            .filter(|c| c.element == ElementId(1))
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(labels, vec!["1%", "2%", "3%"]);
        let completions = out
            .events
            .iter()
            .filter(|e| matches!(e, CoreEvent::AnimationCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn zero_target_finishes_without_counting() {
        let mut out = Outputs::default();
        let mut p =
            ProgressAnimator::start(ElementId(0), ElementId(1), 0, &Config::default(), &mut out);
        p.advance(500.0, &mut out);
        assert!(p.is_finished());
        assert_eq!(p.shown(), 0);
    }
}
