//! Timer primitives derived from accumulated frame time.
//!
//! The stage never sleeps; it is stepped with a dt and these types convert
//! that dt into timeout expiries and interval ticks, carrying any overshoot
//! forward so chained timers keep their cadence across frames.

/// Shortest wait a timer will schedule, mirroring host timer clamping.
pub const MIN_WAIT_MS: f64 = 1.0;

/// One-shot countdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeout {
    remaining_ms: f64,
}

impl Timeout {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            remaining_ms: delay_ms.max(0.0),
        }
    }

    /// Already elapsed; fires on the next advance.
    pub fn immediate() -> Self {
        Self { remaining_ms: 0.0 }
    }

    /// Consume `dt_ms`. Returns the overshoot past expiry when the timeout elapses.
    pub fn advance(&mut self, dt_ms: f64) -> Option<f64> {
        self.remaining_ms -= dt_ms.max(0.0);
        if self.remaining_ms <= 0.0 {
            let overshoot = -self.remaining_ms;
            self.remaining_ms = 0.0;
            Some(overshoot)
        } else {
            None
        }
    }

    /// Re-arm with a new delay, crediting time that already passed.
    pub fn rearm(&mut self, delay_ms: f64, already_elapsed_ms: f64) {
        self.remaining_ms = delay_ms.max(MIN_WAIT_MS) - already_elapsed_ms;
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms.max(0.0)
    }
}

/// Fixed-period repeating timer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    period_ms: f64,
    accumulated_ms: f64,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(MIN_WAIT_MS),
            accumulated_ms: 0.0,
        }
    }

    /// Consume `dt_ms` and return how many whole periods elapsed.
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        self.accumulated_ms += dt_ms.max(0.0);
        let ticks = (self.accumulated_ms / self.period_ms).floor();
        self.accumulated_ms -= ticks * self.period_ms;
        ticks as u32
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_reports_overshoot() {
        let mut t = Timeout::new(150.0);
        assert_eq!(t.advance(100.0), None);
        assert_eq!(t.advance(60.0), Some(10.0));
        // stays elapsed
        assert_eq!(t.advance(0.0), Some(0.0));
    }

    #[test]
    fn immediate_fires_on_zero_dt() {
        let mut t = Timeout::immediate();
        assert_eq!(t.advance(0.0), Some(0.0));
    }

    #[test]
    fn rearm_credits_elapsed_time() {
        let mut t = Timeout::immediate();
        t.rearm(50.0, 20.0);
        assert_eq!(t.remaining_ms(), 30.0);
        assert_eq!(t.advance(30.0), Some(0.0));
    }

    #[test]
    fn interval_counts_whole_periods() {
        let mut i = Interval::new(15.0);
        assert_eq!(i.advance(16.0), 1);
        assert_eq!(i.advance(16.0), 1);
        assert_eq!(i.advance(13.0), 1); // 1 + 1 + 13 = 15
        assert_eq!(i.advance(45.0), 3);
        assert_eq!(i.advance(5.0), 0);
    }

    #[test]
    fn interval_clamps_zero_period() {
        let mut i = Interval::new(0.0);
        assert_eq!(i.period_ms(), MIN_WAIT_MS);
        assert_eq!(i.advance(3.0), 3);
    }
}
