//! Health prober bookkeeping.
//!
//! # Counters
//! ```text
//! success → consecutive_successes += 1, consecutive_failures = 0
//! failure → consecutive_failures += 1, consecutive_successes = 0
//! ```
//!
//! # Design Decisions
//! - Streak counters are mutually exclusive
//! - Cumulative totals feed the success rate, the bounded history feeds inspection
//! - Healthy means fewer than `unhealthy_threshold` failures in a row

use serde::Serialize;
use std::time::{Duration, SystemTime};

use crate::resilience::history::BoundedHistory;

/// Outcome of one probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthRecord {
    pub timestamp: SystemTime,
    pub success: bool,
    pub duration: Duration,
    pub error: Option<String>,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
}

/// Snapshot returned by `HealthChecker::get_status`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub is_monitoring: bool,
    pub target: String,
    pub last_check_time: Option<SystemTime>,
    pub last_check_success: Option<bool>,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub total_checks: u64,
    pub total_successes: u64,
    /// Percentage, two decimals.
    pub success_rate: f64,
    pub is_healthy: bool,
    pub check_interval_secs: u64,
}

#[derive(Debug)]
pub(crate) struct HealthState {
    last_check_time: Option<SystemTime>,
    last_check_success: Option<bool>,
    consecutive_failures: u32,
    consecutive_successes: u32,
    total_checks: u64,
    total_successes: u64,
    history: BoundedHistory<HealthRecord>,
}

impl HealthState {
    pub(crate) fn new(history_capacity: usize) -> Self {
        Self {
            last_check_time: None,
            last_check_success: None,
            consecutive_failures: 0,
            consecutive_successes: 0,
            total_checks: 0,
            total_successes: 0,
            history: BoundedHistory::new(history_capacity),
        }
    }

    /// Apply one probe outcome and return the record that was appended.
    pub(crate) fn record(
        &mut self,
        success: bool,
        duration: Duration,
        error: Option<String>,
    ) -> HealthRecord {
        let now = SystemTime::now();
        self.last_check_time = Some(now);
        self.last_check_success = Some(success);
        self.total_checks += 1;

        if success {
            self.total_successes += 1;
            self.consecutive_successes = self.consecutive_successes.saturating_add(1);
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            self.consecutive_successes = 0;
        }

        let record = HealthRecord {
            timestamp: now,
            success,
            duration,
            error,
            consecutive_failures: self.consecutive_failures,
            consecutive_successes: self.consecutive_successes,
        };
        self.history.push(record.clone());
        record
    }

    pub(crate) fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub(crate) fn history(&self, last_n: usize) -> Vec<HealthRecord> {
        self.history.last(last_n)
    }

    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn snapshot(
        &self,
        is_monitoring: bool,
        target: String,
        unhealthy_threshold: u32,
        interval: Duration,
    ) -> HealthStatus {
        let success_rate = if self.total_checks == 0 {
            0.0
        } else {
            round2(self.total_successes as f64 / self.total_checks as f64 * 100.0)
        };

        HealthStatus {
            is_monitoring,
            target,
            last_check_time: self.last_check_time,
            last_check_success: self.last_check_success,
            consecutive_failures: self.consecutive_failures,
            consecutive_successes: self.consecutive_successes,
            total_checks: self.total_checks,
            total_successes: self.total_successes,
            success_rate,
            is_healthy: self.consecutive_failures < unhealthy_threshold,
            check_interval_secs: interval.as_secs(),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: &HealthState) -> HealthStatus {
        state.snapshot(true, "test".to_string(), 3, Duration::from_secs(10))
    }

    #[test]
    fn test_streaks_are_exclusive() {
        let mut state = HealthState::new(100);
        for n in 1..=4 {
            let record = state.record(false, Duration::from_millis(5), Some("down".into()));
            assert_eq!(record.consecutive_failures, n);
            assert_eq!(record.consecutive_successes, 0);
        }
        assert!(!snapshot(&state).is_healthy);

        let record = state.record(true, Duration::from_millis(5), None);
        assert_eq!(record.consecutive_failures, 0);
        assert_eq!(record.consecutive_successes, 1);
        assert!(snapshot(&state).is_healthy);
    }

    #[test]
    fn test_success_rate() {
        let mut state = HealthState::new(100);
        assert_eq!(snapshot(&state).success_rate, 0.0);

        state.record(true, Duration::ZERO, None);
        state.record(true, Duration::ZERO, None);
        state.record(false, Duration::ZERO, Some("x".into()));

        let status = snapshot(&state);
        assert_eq!(status.total_checks, 3);
        assert_eq!(status.total_successes, 2);
        assert_eq!(status.success_rate, 66.67);
        assert_eq!(status.last_check_success, Some(false));
    }

    #[test]
    fn test_history_is_capped_but_totals_are_not() {
        let mut state = HealthState::new(5);
        for i in 0..12 {
            state.record(i % 2 == 0, Duration::ZERO, None);
        }
        assert_eq!(state.history_len(), 5);
        assert_eq!(snapshot(&state).total_checks, 12);

        let last_two = state.history(2);
        assert_eq!(last_two.len(), 2);
        assert!(!last_two[1].success);
    }

    #[test]
    fn test_two_failures_still_healthy() {
        let mut state = HealthState::new(10);
        state.record(false, Duration::ZERO, None);
        state.record(false, Duration::ZERO, None);
        assert!(snapshot(&state).is_healthy);
        assert_eq!(state.consecutive_failures(), 2);
    }
}
