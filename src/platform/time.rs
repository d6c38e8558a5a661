//! Frame timing

use crate::consts::REFERENCE_FRAME_MS;

/// Turns monotonic frame timestamps (ms) into per-frame elapsed time
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Elapsed milliseconds since the previous call.
    ///
    /// The first frame after construction or [`FrameClock::reset`] reports one
    /// reference frame. A timestamp that goes backwards reports zero.
    pub fn elapsed(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => REFERENCE_FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        elapsed
    }

    /// Forget the previous timestamp (call when the frame loop stops)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_one_reference_frame() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.elapsed(5000.0), REFERENCE_FRAME_MS);
        assert_eq!(clock.elapsed(5020.0), 20.0);
    }

    #[test]
    fn test_reset_skips_the_gap() {
        let mut clock = FrameClock::new();
        clock.elapsed(100.0);
        clock.reset();
        assert_eq!(clock.elapsed(60_000.0), REFERENCE_FRAME_MS);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.elapsed(100.0);
        assert_eq!(clock.elapsed(90.0), 0.0);
    }
}
