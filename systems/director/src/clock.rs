//! Round clock and the elapsed-time difficulty curve.

use std::time::Duration;

use vr_survival_core::DifficultyTier;

/// Accumulates gameplay time while a round is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameClock {
    elapsed: Duration,
}

impl GameClock {
    /// Creates a clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }

    /// Adds `dt` to the elapsed time.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Rewinds the clock to zero.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Time accumulated since the last reset.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Elapsed times at which the difficulty escalates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierThresholds {
    enhanced: Duration,
    extreme: Duration,
}

impl TierThresholds {
    /// Creates thresholds, ordering them so Extreme never precedes Enhanced.
    #[must_use]
    pub fn new(enhanced: Duration, extreme: Duration) -> Self {
        Self {
            enhanced: enhanced.min(extreme),
            extreme: extreme.max(enhanced),
        }
    }

    /// Elapsed time at which Enhanced activates.
    #[must_use]
    pub const fn enhanced(&self) -> Duration {
        self.enhanced
    }

    /// Elapsed time at which Extreme activates.
    #[must_use]
    pub const fn extreme(&self) -> Duration {
        self.extreme
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), Duration::from_secs(75))
    }
}

/// Tier implied by `elapsed`. Monotonic in `elapsed`.
#[must_use]
pub fn tier_at(elapsed: Duration, thresholds: &TierThresholds) -> DifficultyTier {
    if elapsed >= thresholds.extreme {
        DifficultyTier::Extreme
    } else if elapsed >= thresholds.enhanced {
        DifficultyTier::Enhanced
    } else {
        DifficultyTier::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_thresholds_inclusively() {
        let thresholds = TierThresholds::default();
        let at = |secs: f32| tier_at(Duration::from_secs_f32(secs), &thresholds);

        assert_eq!(at(0.0), DifficultyTier::Normal);
        assert_eq!(at(59.9), DifficultyTier::Normal);
        assert_eq!(at(60.0), DifficultyTier::Enhanced);
        assert_eq!(at(74.9), DifficultyTier::Enhanced);
        assert_eq!(at(75.0), DifficultyTier::Extreme);
        assert_eq!(at(600.0), DifficultyTier::Extreme);
    }

    #[test]
    fn swapped_thresholds_are_reordered() {
        let thresholds = TierThresholds::new(Duration::from_secs(80), Duration::from_secs(20));
        assert_eq!(thresholds.enhanced(), Duration::from_secs(20));
        assert_eq!(thresholds.extreme(), Duration::from_secs(80));
    }

    #[test]
    fn clock_accumulates_and_resets() {
        let mut clock = GameClock::new();
        clock.advance(Duration::from_millis(1500));
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));

        clock.reset();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }
}
