//! Pointer parallax for project cards.

use crate::config::TiltConfig;
use crate::inputs::Rect;

/// CSS transform for a pointer at (`client_x`, `client_y`) over `rect`.
/// Returns None for a degenerate rect.
pub fn tilt_transform(
    cfg: &TiltConfig,
    client_x: f64,
    client_y: f64,
    rect: &Rect,
) -> Option<String> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let px = (client_x - rect.left) / rect.width;
    let py = (client_y - rect.top) / rect.height;
    let rx = (py - 0.5) * cfg.pitch_deg;
    let ry = (px - 0.5) * cfg.yaw_deg;
    Some(format!(
        "translateY(-{}px) rotateX({}deg) rotateY({}deg)",
        cfg.lift_px,
        round3(rx),
        round3(ry)
    ))
}

fn round3(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    // avoid printing "-0"
    if r == 0.0 {
        0.0
    } else {
        r
    }
}
