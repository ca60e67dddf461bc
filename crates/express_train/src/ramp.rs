// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cancellable timed speed interpolation.

/// Linear interpolation from one speed to another over a fixed duration.
///
/// The ramp itself is passive: a scheduler advances it tick by tick and
/// delivers each value back to the owning train. Cancellation is the
/// scheduler discarding its entry, so a cancelled ramp can never tick
/// again; cancelling after completion is a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRamp {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
}

impl SpeedRamp {
    /// Ramp from `from` to `to` over `duration_ms` milliseconds.
    pub fn new(from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms` and return the interpolated speed.
    ///
    /// A zero-duration ramp completes on its first advance.
    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        self.elapsed_ms += dt_ms;
        self.value()
    }

    /// Current interpolated speed, clamped to the target past the end.
    pub fn value(&self) -> f32 {
        if self.duration_ms <= 0.0 || self.elapsed_ms >= self.duration_ms {
            return self.to;
        }
        let t = self.elapsed_ms / self.duration_ms;
        self.from + (self.to - self.from) * t
    }

    /// Whether the full duration has elapsed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Final speed of the ramp.
    pub fn target(&self) -> f32 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_value() {
        let mut ramp = SpeedRamp::new(0.0, 4.0, 1000.0);
        assert_eq!(ramp.advance(500.0), 2.0);
        assert!(!ramp.is_finished());
    }

    #[test]
    fn test_clamps_past_end() {
        let mut ramp = SpeedRamp::new(1.0, 3.0, 200.0);
        assert_eq!(ramp.advance(1000.0), 3.0);
        assert!(ramp.is_finished());
        assert_eq!(ramp.advance(1.0), 3.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut ramp = SpeedRamp::new(5.0, 0.0, 0.0);
        assert_eq!(ramp.advance(0.1), 0.0);
        assert!(ramp.is_finished());
    }

    #[test]
    fn test_descending_ramp() {
        let mut ramp = SpeedRamp::new(2.0, -2.0, 1000.0);
        assert_eq!(ramp.advance(250.0), 1.0);
        assert_eq!(ramp.target(), -2.0);
    }
}
