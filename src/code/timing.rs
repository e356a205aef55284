// src/code/timing.rs  —  WPM → element durations (PARIS standard)
use std::time::Duration;

/// Dot/dash lengths for synthesized CW tones.  Gaps between elements,
/// letters and words come from the user's spacing parameters instead.
#[derive(Debug, Clone, Copy)]
pub struct ElementTiming {
    pub dot:  Duration,  // 1 unit
    pub dash: Duration,  // 3 units
}

impl ElementTiming {
    /// PARIS standard: dot = 1200 ms / wpm
    pub fn from_wpm(wpm: u8) -> Self {
        let wpm = wpm.max(1) as u64;
        let dot_ms = 1200 / wpm;
        Self {
            dot:  Duration::from_millis(dot_ms),
            dash: Duration::from_millis(dot_ms * 3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paris_twenty_wpm() {
        let t = ElementTiming::from_wpm(20);
        assert_eq!(t.dot, Duration::from_millis(60));
        assert_eq!(t.dash, Duration::from_millis(180));
    }

    #[test]
    fn zero_wpm_clamps_instead_of_dividing_by_zero() {
        let t = ElementTiming::from_wpm(0);
        assert_eq!(t.dot, Duration::from_millis(1200));
    }
}
