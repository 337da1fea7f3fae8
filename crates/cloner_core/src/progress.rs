//! Simulated progress for an in-flight clone operation.
//!
//! The estimate is a perception aid only. It is advanced by a fixed-interval
//! ticker, not by fetch completion, and nothing may read it to decide whether
//! results are ready.

/// Upper bound approached while waiting for the remote service.
pub const WAIT_CEILING: f32 = 90.0;
/// Largest share of the remaining distance covered by a single tick.
pub const MAX_TICK_FRACTION: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressEstimate {
    value: f32,
}

impl ProgressEstimate {
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Rounded percentage for display.
    pub fn percent(&self) -> u8 {
        self.value.round().clamp(0.0, 100.0) as u8
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Advance toward [`WAIT_CEILING`] by `jitter` (in `[0, 1)`) times the maximum step.
    ///
    /// Never decreases and never reaches the ceiling.
    pub fn advance(&mut self, jitter: f32) {
        if self.value >= WAIT_CEILING {
            return;
        }
        let jitter = if jitter.is_finite() {
            jitter.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let remaining = WAIT_CEILING - self.value;
        let next = self.value + remaining * jitter * MAX_TICK_FRACTION;
        if next < WAIT_CEILING {
            self.value = next.max(self.value);
        }
    }

    pub fn complete(&mut self) {
        self.value = 100.0;
    }
}
