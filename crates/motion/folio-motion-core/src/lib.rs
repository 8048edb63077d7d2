//! Folio Motion Core (host-agnostic)
//!
//! Scheduling and state-machine logic for a single-page portfolio: a looping
//! typewriter, scroll-triggered reveals, progress bars with percentage labels,
//! frame-driven stat counters and a lazily rendered chart.
//!
//! The host owns the DOM. It feeds visibility/scroll/pointer observations in as
//! [`Inputs`], steps the [`Stage`] once per animation frame, and applies the
//! returned [`Outputs`] (text, width, opacity, transform, class changes and
//! chart render requests).

pub mod chart;
pub mod config;
pub mod counter;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod outputs;
pub mod params;
pub mod progress;
pub mod stage;
pub mod tilt;
pub mod timer;
pub mod typer;
pub mod visibility;

// Re-exports for consumers (adapters)
pub use chart::{ChartBootstrap, ChartKind, ChartSpec};
pub use config::Config;
pub use counter::{Completion, CounterAnimator, ScrollGate};
pub use error::{ConfigError, ParamError};
pub use ids::{ElementId, IdAllocator, SubscriptionId};
pub use inputs::{Inputs, PointerSample, Rect, ScrollSample, SectionTop, VisibilityEntry};
pub use outputs::{AnimationKind, Change, ChartRender, CoreEvent, Outputs, Property};
pub use progress::ProgressAnimator;
pub use stage::{
    ChartTarget, CounterSection, CounterTarget, PageLayout, SkillCard, Stage, TiltCard,
    TyperTarget,
};
pub use typer::{Typer, TyperMode, TyperState, TyperTiming, Wait};
pub use visibility::{Fired, ObserveOptions, VisibilityTrigger};
