//! Error types for declarative parameters and configuration.

use thiserror::Error;

/// Failure to read an animation parameter from a declarative attribute.
///
/// These never abort setup: the stage logs them and falls back to an empty
/// or zero default for the affected component only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("invalid phrase list `{raw}`: {reason}")]
    InvalidPhrases { raw: String, reason: String },

    #[error("invalid number `{raw}` for {attribute}")]
    InvalidNumber { attribute: &'static str, raw: String },
}

/// Configuration values the stage cannot run with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}
