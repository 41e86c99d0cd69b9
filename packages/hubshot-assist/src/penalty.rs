//! Held-cargo penalty avoidance.

use std::time::Duration;

use crate::{cargo::CargoMode, config::PenaltyConfig};

/// Forces a shot shortly before a held-cargo penalty would be assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyGuard {
    lead_time: Duration,
}

impl PenaltyGuard {
    /// Creates a guard that fires `lead_time` ahead of the penalty.
    #[must_use]
    pub const fn new(lead_time: Duration) -> Self {
        Self { lead_time }
    }

    /// The configured lead time.
    #[must_use]
    pub const fn lead_time(&self) -> Duration {
        self.lead_time
    }

    /// Returns `true` if the shoot button must be forced this tick.
    ///
    /// All-cargo mode never forces a shot.
    #[must_use]
    pub fn should_shoot(&self, time_until_penalty: Option<Duration>, mode: CargoMode) -> bool {
        mode != CargoMode::All && time_until_penalty.is_some_and(|time| time <= self.lead_time)
    }
}

/// Estimates the time until a held-cargo penalty from the held-cargo count.
///
/// The clock starts when the robot first holds `held_limit` cargo and stops as soon as it
/// holds fewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyClock {
    held_limit: u32,
    hold_time: Duration,
    elapsed: Option<Duration>,
}

impl PenaltyClock {
    /// Creates a stopped clock.
    #[must_use]
    pub const fn new(config: &PenaltyConfig) -> Self {
        Self {
            held_limit: config.held_limit,
            hold_time: config.hold_time(),
            elapsed: None,
        }
    }

    /// Advances the clock by one tick and returns the estimated time until the penalty.
    pub fn update(&mut self, held_cargo: u32, dt: Duration) -> Option<Duration> {
        if held_cargo < self.held_limit {
            self.elapsed = None;
            return None;
        }

        let elapsed = self.elapsed.map_or(Duration::ZERO, |elapsed| elapsed + dt);
        self.elapsed = Some(elapsed);

        Some(self.hold_time.saturating_sub(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAD: Duration = Duration::from_millis(250);

    #[test]
    fn fires_within_lead_time() {
        let guard = PenaltyGuard::new(LEAD);
        let soon = Some(Duration::from_millis(200));

        assert!(guard.should_shoot(soon, CargoMode::Two));
        assert!(guard.should_shoot(soon, CargoMode::Three));
        assert!(!guard.should_shoot(soon, CargoMode::All));
    }

    #[test]
    fn boundary_is_inclusive() {
        let guard = PenaltyGuard::new(LEAD);
        assert!(guard.should_shoot(Some(LEAD), CargoMode::Two));
        assert!(!guard.should_shoot(Some(LEAD + Duration::from_millis(1)), CargoMode::Two));
        assert!(!guard.should_shoot(None, CargoMode::Two));
    }

    #[test]
    fn clock_counts_down_while_full() {
        let mut clock = PenaltyClock::new(&PenaltyConfig::default());
        let dt = Duration::from_millis(500);

        assert_eq!(clock.update(2, dt), None);
        assert_eq!(clock.update(3, dt), Some(Duration::from_millis(1625)));
        assert_eq!(clock.update(3, dt), Some(Duration::from_millis(1125)));
        assert_eq!(clock.update(4, dt), Some(Duration::from_millis(625)));
        assert_eq!(clock.update(3, dt), Some(Duration::from_millis(125)));
        assert_eq!(clock.update(3, dt), Some(Duration::ZERO));

        assert_eq!(clock.update(1, dt), None);
        assert_eq!(clock.update(3, dt), Some(Duration::from_millis(1625)));
    }
}
