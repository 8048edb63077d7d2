//! Output contracts from the stage.
//!
//! Outputs carry only the presentation changes for this frame, keyed by
//! ElementId, plus chart render requests and a separate list of semantic
//! events. Adapters apply changes to the host and may forward events.

use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;
use crate::ids::{ElementId, SubscriptionId};

/// Which presentation property of an element a change targets.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Property {
    Text,
    /// Inline `width` style, e.g. `"75%"`.
    Width,
    /// Inline `opacity` style.
    Opacity,
    /// Inline `transform` style; empty string clears it.
    Transform,
    /// Add a CSS class (value is the class name).
    AddClass,
}

/// One changed element property this frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Change {
    pub element: ElementId,
    pub property: Property,
    pub value: String,
}

impl Change {
    pub fn text(element: ElementId, value: impl Into<String>) -> Self {
        Self {
            element,
            property: Property::Text,
            value: value.into(),
        }
    }

    pub fn width(element: ElementId, value: impl Into<String>) -> Self {
        Self {
            element,
            property: Property::Width,
            value: value.into(),
        }
    }
}

/// A request to draw a chart into a container, issued at most once per container.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChartRender {
    /// Element whose visibility triggered the render.
    pub container: ElementId,
    /// Drawing surface handed to the charting library.
    pub canvas: ElementId,
    pub spec: ChartSpec,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnimationKind {
    Typer,
    Reveal,
    Progress,
    Counter,
    Chart,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum CoreEvent {
    TriggerFired {
        subscription: SubscriptionId,
        element: ElementId,
    },
    /// No subscription watches this element any more; the host may stop observing it.
    Unobserved {
        element: ElementId,
    },
    AnimationStarted {
        element: ElementId,
        kind: AnimationKind,
    },
    AnimationCompleted {
        element: ElementId,
        kind: AnimationKind,
    },
    PhraseTyped {
        element: ElementId,
        phrase: usize,
    },
}

/// Outputs returned by Stage::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub charts: Vec<ChartRender>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.charts.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.charts.is_empty() && self.events.is_empty()
    }

    /// Last value written to `property` of `element` this frame.
    pub fn last_value(&self, element: ElementId, property: Property) -> Option<&str> {
        self.changes
            .iter()
            .rev()
            .find(|c| c.element == element && c.property == property)
            .map(|c| c.value.as_str())
    }
}
