//! Handles shared between the stage and its host.

use serde::{Deserialize, Serialize};

/// A page element as the host numbers it; the stage never dereferences it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// One visibility subscription, returned by `VisibilityTrigger::observe`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// Hands out element and subscription handles in registration order.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_element: u32,
    next_subscription: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_element(&mut self) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element = self.next_element.wrapping_add(1);
        id
    }

    pub fn alloc_subscription(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_and_subscriptions_count_separately() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.alloc_element(), ElementId(0));
        assert_eq!(ids.alloc_subscription(), SubscriptionId(0));
        assert_eq!(ids.alloc_element(), ElementId(1));
        assert_eq!(ids.alloc_subscription(), SubscriptionId(1));
    }
}
