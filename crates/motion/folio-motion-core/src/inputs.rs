//! Input contracts for the stage.
//!
//! The host collects observations between frames (intersection records,
//! the latest scroll position, pointer movement over cards) and passes
//! them into Stage::update() with the frame's dt.

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Intersection records in the order the host observed them.
    #[serde(default)]
    pub visibility: Vec<VisibilityEntry>,
    /// Latest scroll state, if the page scrolled since the previous frame.
    #[serde(default)]
    pub scroll: Option<ScrollSample>,
    /// Pointer samples over tilt cards, oldest first.
    #[serde(default)]
    pub pointer: Vec<PointerSample>,
}

/// One intersection record for an observed element.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct VisibilityEntry {
    pub element: ElementId,
    /// Visible fraction of the element in [0, 1].
    pub ratio: f32,
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    pub fn visible(element: ElementId, ratio: f32) -> Self {
        Self {
            element,
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    pub fn hidden(element: ElementId) -> Self {
        Self {
            element,
            ratio: 0.0,
            is_intersecting: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ScrollSample {
    pub scroll_y: f64,
    pub viewport_height: f64,
    /// Bounding-rect tops (viewport coordinates) of sections the stage asked for.
    #[serde(default)]
    pub sections: Vec<SectionTop>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SectionTop {
    pub element: ElementId,
    pub top: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub enum PointerSample {
    Move {
        card: ElementId,
        client_x: f64,
        client_y: f64,
        rect: Rect,
    },
    Leave {
        card: ElementId,
    },
}

impl PointerSample {
    pub fn card(&self) -> ElementId {
        match self {
            PointerSample::Move { card, .. } | PointerSample::Leave { card } => *card,
        }
    }
}
