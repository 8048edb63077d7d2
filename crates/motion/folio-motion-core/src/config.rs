//! Core configuration for folio-motion-core.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timing constants and thresholds for every animator the stage wires up.
/// All durations are milliseconds of host time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base delay between typed characters.
    pub type_delay_ms: f64,
    /// Hold time once a phrase is fully typed.
    pub type_pause_ms: f64,
    /// Upper bound (exclusive) of the random delay added to each keystroke.
    pub type_jitter_ms: f64,
    /// Gap between clearing a phrase and typing the next one.
    pub next_phrase_ms: f64,
    /// Seed for the keystroke jitter source.
    pub jitter_seed: u64,

    /// Delay before a progress bar receives its target width.
    pub progress_bar_delay_ms: f64,
    /// Interval of the percentage label counter.
    pub progress_tick_ms: f64,

    /// Number of frames a stat counter takes to reach its target.
    pub counter_speed: f64,
    /// Counters start once the section top is above `viewport_height - offset`.
    pub counter_section_offset_px: f64,

    pub reveal_threshold: f32,
    pub card_threshold: f32,
    pub chart_threshold: f32,

    /// Scroll position past which the back-to-top button is shown.
    pub back_to_top_after_px: f64,

    /// Upper bound on a single frame step; longer gaps (hidden tabs) are truncated.
    pub max_frame_dt_ms: f64,

    pub tilt: TiltConfig,
}

/// Pointer parallax applied to project cards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TiltConfig {
    pub lift_px: f64,
    /// Degrees of rotateX per unit of vertical offset from the card centre.
    pub pitch_deg: f64,
    /// Degrees of rotateY per unit of horizontal offset from the card centre.
    pub yaw_deg: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            lift_px: 6.0,
            pitch_deg: 6.0,
            yaw_deg: -10.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            type_delay_ms: 50.0,
            type_pause_ms: 1400.0,
            type_jitter_ms: 60.0,
            next_phrase_ms: 200.0,
            jitter_seed: 0x5eed_f011_0000_0001,
            progress_bar_delay_ms: 150.0,
            progress_tick_ms: 15.0,
            counter_speed: 100.0,
            counter_section_offset_px: 100.0,
            reveal_threshold: 0.12,
            card_threshold: 0.3,
            chart_threshold: 0.3,
            back_to_top_after_px: 400.0,
            max_frame_dt_ms: 250.0,
            tilt: TiltConfig::default(),
        }
    }
}

impl Config {
    /// Reject values that would stall or spin an animator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("reveal_threshold", self.reveal_threshold),
            ("card_threshold", self.card_threshold),
            ("chart_threshold", self.chart_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("progress_tick_ms", self.progress_tick_ms),
            ("counter_speed", self.counter_speed),
            ("max_frame_dt_ms", self.max_frame_dt_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        for (field, value) in [
            ("type_delay_ms", self.type_delay_ms),
            ("type_pause_ms", self.type_pause_ms),
            ("type_jitter_ms", self.type_jitter_ms),
            ("next_phrase_ms", self.next_phrase_ms),
            ("progress_bar_delay_ms", self.progress_bar_delay_ms),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}
