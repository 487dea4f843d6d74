//! Per-datacenter debounce state and the threshold policy driving it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the consecutive-failure count is compared against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// An outage starts on the `threshold`-th consecutive failure.
    #[default]
    Inclusive,
    /// An outage starts on the failure after the `threshold`-th.
    Exclusive,
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMode::Inclusive => f.write_str("inclusive"),
            ThresholdMode::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// When a failure streak becomes an outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutagePolicy {
    pub threshold: u32,
    pub mode: ThresholdMode,
}

impl OutagePolicy {
    /// Default number of consecutive failures that confirms an outage.
    pub const DEFAULT_THRESHOLD: u32 = 3;

    pub const fn new(threshold: u32, mode: ThresholdMode) -> Self {
        Self { threshold, mode }
    }

    /// Whether `failures` consecutive failures confirm an outage.
    pub fn is_outage(&self, failures: u32) -> bool {
        match self.mode {
            ThresholdMode::Inclusive => failures >= self.threshold,
            ThresholdMode::Exclusive => failures > self.threshold,
        }
    }
}

impl Default for OutagePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD, ThresholdMode::Inclusive)
    }
}

/// A state change that must be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Healthy -> Outage.
    Started,
    /// Outage -> Healthy.
    Cleared,
}

/// Debounce state for one datacenter.
///
/// `in_outage` is set exactly when a [`Transition::Started`] has been
/// returned and no [`Transition::Cleared`] since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatacenterState {
    consecutive_failures: u32,
    in_outage: bool,
}

impl DatacenterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn in_outage(&self) -> bool {
        self.in_outage
    }

    /// Feed one classified sample through the hysteresis filter.
    ///
    /// A single accessible sample clears an outage; entering one takes a
    /// streak of failures that satisfies `policy`.
    pub fn observe(&mut self, accessible: bool, policy: &OutagePolicy) -> Option<Transition> {
        if accessible {
            self.consecutive_failures = 0;
            if self.in_outage {
                self.in_outage = false;
                return Some(Transition::Cleared);
            }
            return None;
        }

        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if !self.in_outage && policy.is_outage(self.consecutive_failures) {
            self.in_outage = true;
            return Some(Transition::Started);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(samples: &[f64], policy: &OutagePolicy) -> Vec<Option<Transition>> {
        let mut state = DatacenterState::new();
        samples
            .iter()
            .map(|&s| state.observe(s == 0.0, policy))
            .collect()
    }

    #[test]
    fn test_policy_inclusive() {
        let policy = OutagePolicy::default();
        assert!(!policy.is_outage(2));
        assert!(policy.is_outage(3));
        assert!(policy.is_outage(4));
    }

    #[test]
    fn test_policy_exclusive() {
        let policy = OutagePolicy::new(3, ThresholdMode::Exclusive);
        assert!(!policy.is_outage(3));
        assert!(policy.is_outage(4));
    }

    #[test]
    fn test_starts_on_third_failure() {
        let events = feed(&[1.0, 1.0, 1.0], &OutagePolicy::default());
        assert_eq!(events, vec![None, None, Some(Transition::Started)]);
    }

    #[test]
    fn test_clears_on_first_success() {
        let events = feed(&[1.0, 1.0, 1.0, 0.0], &OutagePolicy::default());
        assert_eq!(
            events,
            vec![None, None, Some(Transition::Started), Some(Transition::Cleared)]
        );
    }

    #[test]
    fn test_recovery_restarts_count() {
        let events = feed(&[1.0, 1.0, 0.0, 1.0, 1.0, 1.0], &OutagePolicy::default());
        assert_eq!(
            events,
            vec![None, None, None, None, None, Some(Transition::Started)]
        );
    }

    #[test]
    fn test_started_fires_once_per_streak() {
        let events = feed(&[5.0; 10], &OutagePolicy::default());
        let started = events
            .iter()
            .filter(|e| **e == Some(Transition::Started))
            .count();
        assert_eq!(started, 1);
        assert_eq!(events[2], Some(Transition::Started));
    }

    #[test]
    fn test_exclusive_waits_for_fourth_failure() {
        let policy = OutagePolicy::new(3, ThresholdMode::Exclusive);
        let events = feed(&[1.0, 1.0, 1.0, 1.0], &policy);
        assert_eq!(events, vec![None, None, None, Some(Transition::Started)]);
    }

    #[test]
    fn test_healthy_is_idempotent() {
        let mut state = DatacenterState::new();
        let policy = OutagePolicy::default();
        for _ in 0..5 {
            assert_eq!(state.observe(true, &policy), None);
            assert_eq!(state.consecutive_failures(), 0);
            assert!(!state.in_outage());
        }
    }

    #[test]
    fn test_threshold_of_one() {
        let policy = OutagePolicy::new(1, ThresholdMode::Inclusive);
        let events = feed(&[1.0, 0.0, 1.0], &policy);
        assert_eq!(
            events,
            vec![
                Some(Transition::Started),
                Some(Transition::Cleared),
                Some(Transition::Started)
            ]
        );
    }
}
