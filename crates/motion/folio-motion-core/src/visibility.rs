//! Visibility trigger: turns raw intersection records into threshold
//! crossing callbacks.
//!
//! One trigger watches any number of elements. Each subscription carries its
//! own threshold and repeat policy plus an action value handed back to the
//! owner when it fires. A subscription fires on the transition from "not
//! visible enough" to "visible enough"; staying visible does not fire again,
//! and leaving visibility re-arms repeatable subscriptions. One-shot
//! subscriptions are removed as soon as they fire.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, IdAllocator, SubscriptionId};
use crate::inputs::VisibilityEntry;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserveOptions {
    /// Minimum visible fraction, in [0, 1].
    pub threshold: f32,
    pub one_shot: bool,
}

impl ObserveOptions {
    pub fn once(threshold: f32) -> Self {
        Self {
            threshold,
            one_shot: true,
        }
    }

    pub fn repeat(threshold: f32) -> Self {
        Self {
            threshold,
            one_shot: false,
        }
    }
}

#[derive(Debug)]
struct Subscription<A> {
    element: ElementId,
    action: A,
    options: ObserveOptions,
    /// Whether the last record for this element was past the threshold.
    visible: bool,
}

/// A fired subscription.
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<A> {
    pub subscription: SubscriptionId,
    pub element: ElementId,
    pub action: A,
}

#[derive(Debug)]
pub struct VisibilityTrigger<A> {
    ids: IdAllocator,
    subs: IndexMap<SubscriptionId, Subscription<A>>,
}

impl<A> Default for VisibilityTrigger<A> {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            subs: IndexMap::new(),
        }
    }
}

impl<A: Clone> VisibilityTrigger<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `element`; `action` is returned each time the subscription fires.
    pub fn observe(
        &mut self,
        element: ElementId,
        action: A,
        options: ObserveOptions,
    ) -> SubscriptionId {
        let id = self.ids.alloc_subscription();
        let options = ObserveOptions {
            threshold: options.threshold.clamp(0.0, 1.0),
            ..options
        };
        self.subs.insert(
            id,
            Subscription {
                element,
                action,
                options,
                visible: false,
            },
        );
        id
    }

    /// Drop one subscription. Returns false if it was already gone.
    pub fn unobserve(&mut self, id: SubscriptionId) -> bool {
        self.subs.shift_remove(&id).is_some()
    }

    /// Drop every subscription.
    pub fn disconnect(&mut self) {
        self.subs.clear();
    }

    pub fn is_active(&self, id: SubscriptionId) -> bool {
        self.subs.contains_key(&id)
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.subs.values().any(|s| s.element == element)
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Distinct elements still watched, in subscription order.
    pub fn observed_elements(&self) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = Vec::new();
        for sub in self.subs.values() {
            if !out.contains(&sub.element) {
                out.push(sub.element);
            }
        }
        out
    }

    /// Distinct thresholds in ascending order, for configuring the host observer.
    pub fn thresholds(&self) -> Vec<f32> {
        let mut out: Vec<f32> = self.subs.values().map(|s| s.options.threshold).collect();
        out.sort_by(f32::total_cmp);
        out.dedup();
        out
    }

    /// Feed intersection records in observation order and collect what fired.
    ///
    /// Elements whose last subscription was torn down are appended to
    /// `released` so the host can stop observing them.
    pub fn process(
        &mut self,
        entries: &[VisibilityEntry],
        released: &mut Vec<ElementId>,
    ) -> Vec<Fired<A>> {
        let mut fired = Vec::new();
        for entry in entries {
            let mut spent: Vec<SubscriptionId> = Vec::new();
            for (id, sub) in self.subs.iter_mut() {
                if sub.element != entry.element {
                    continue;
                }
                let now_visible = crosses(entry, sub.options.threshold);
                if now_visible && !sub.visible {
                    fired.push(Fired {
                        subscription: *id,
                        element: sub.element,
                        action: sub.action.clone(),
                    });
                    if sub.options.one_shot {
                        spent.push(*id);
                    }
                }
                sub.visible = now_visible;
            }
            if spent.is_empty() {
                continue;
            }
            for id in spent {
                self.subs.shift_remove(&id);
            }
            if !self.is_observing(entry.element) && !released.contains(&entry.element) {
                released.push(entry.element);
            }
        }
        fired
    }
}

fn crosses(entry: &VisibilityEntry, threshold: f32) -> bool {
    entry.is_intersecting && entry.ratio >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeatable_fires_once_per_crossing() {
        let mut trig = VisibilityTrigger::new();
        let el = ElementId(1);
        trig.observe(el, "reveal", ObserveOptions::repeat(0.12));
        let mut released = Vec::new();

        let f = trig.process(&[VisibilityEntry::visible(el, 0.2)], &mut released);
        assert_eq!(f.len(), 1);
        // still visible: no new crossing
        let f = trig.process(&[VisibilityEntry::visible(el, 0.6)], &mut released);
        assert!(f.is_empty());
        // leave and re-enter
        let f = trig.process(
            &[
                VisibilityEntry::hidden(el),
                VisibilityEntry::visible(el, 0.5),
            ],
            &mut released,
        );
        assert_eq!(f.len(), 1);
        assert!(released.is_empty());
        assert!(trig.is_observing(el));
    }

    #[test]
    fn below_threshold_does_not_fire() {
        let mut trig = VisibilityTrigger::new();
        let el = ElementId(1);
        trig.observe(el, (), ObserveOptions::once(0.3));
        let mut released = Vec::new();
        let f = trig.process(&[VisibilityEntry::visible(el, 0.29)], &mut released);
        assert!(f.is_empty());
        let f = trig.process(&[VisibilityEntry::visible(el, 0.3)], &mut released);
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn one_shot_tears_down_and_releases() {
        let mut trig = VisibilityTrigger::new();
        let el = ElementId(4);
        let id = trig.observe(el, 7u8, ObserveOptions::once(0.3));
        let mut released = Vec::new();
        let f = trig.process(
            &[
                VisibilityEntry::visible(el, 0.5),
                VisibilityEntry::hidden(el),
                VisibilityEntry::visible(el, 0.9),
            ],
            &mut released,
        );
        assert_eq!(
            f,
            vec![Fired {
                subscription: id,
                element: el,
                action: 7u8
            }]
        );
        assert!(!trig.is_active(id));
        assert_eq!(released, vec![el]);
        assert!(trig.is_empty());
    }

    #[test]
    fn shared_element_keeps_other_subscriptions() {
        let mut trig = VisibilityTrigger::new();
        let el = ElementId(2);
        trig.observe(el, "card", ObserveOptions::once(0.3));
        trig.observe(el, "reveal", ObserveOptions::repeat(0.12));
        let mut released = Vec::new();

        let f = trig.process(&[VisibilityEntry::visible(el, 0.2)], &mut released);
        assert_eq!(f.iter().map(|f| f.action).collect::<Vec<_>>(), vec!["reveal"]);
        let f = trig.process(&[VisibilityEntry::visible(el, 0.4)], &mut released);
        assert_eq!(f.iter().map(|f| f.action).collect::<Vec<_>>(), vec!["card"]);
        assert!(released.is_empty());
        assert_eq!(trig.observed_elements(), vec![el]);
    }

    #[test]
    fn thresholds_are_sorted_and_unique() {
        let mut trig = VisibilityTrigger::new();
        trig.observe(ElementId(0), (), ObserveOptions::once(0.3));
        trig.observe(ElementId(1), (), ObserveOptions::repeat(0.12));
        trig.observe(ElementId(2), (), ObserveOptions::once(0.3));
        assert_eq!(trig.thresholds(), vec![0.12, 0.3]);
    }

    #[test]
    fn disconnect_stops_everything() {
        let mut trig = VisibilityTrigger::new();
        let el = ElementId(0);
        trig.observe(el, (), ObserveOptions::repeat(0.0));
        trig.disconnect();
        let mut released = Vec::new();
        assert!(trig
            .process(&[VisibilityEntry::visible(el, 1.0)], &mut released)
            .is_empty());
    }
}
