//! Circuit breaker guarding a flaky dependency.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: testing if the dependency recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= threshold
//! Open → Half-Open: recovery timeout elapsed since the last failure
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails
//! ```
//!
//! # Design Decisions
//! - Fail fast in Open state; the wrapped operation is never invoked
//! - Single trial call in Half-Open; concurrent callers are rejected until it settles
//! - The lock is held for bookkeeping only, never across the operation itself
//! - Errors are counted and passed through, never swallowed

use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, SystemTime};
use tokio::time::Instant;

use crate::observability::metrics;
use crate::resilience::error::{BreakerError, CircuitOpenError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

/// Read-only snapshot returned by [`CircuitBreaker::get_state_info`].
#[derive(Debug, Clone, Serialize)]
pub struct CircuitStateInfo {
    pub state: CircuitState,
    pub failure_count: u32,
    pub failure_threshold: u32,
    pub last_failure_time: Option<SystemTime>,
    pub recovery_timeout_secs: u64,
    pub is_operational: bool,
}

struct BreakerState {
    current: CircuitState,
    failure_count: u32,
    last_failure: Option<Instant>,
    last_failure_wall: Option<SystemTime>,
    trial_in_flight: bool,
}

pub struct CircuitBreaker {
    failure_threshold: u32,
    recovery_timeout: Duration,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, recovery_timeout: Duration) -> Self {
        tracing::info!(
            failure_threshold,
            recovery_timeout_secs = recovery_timeout.as_secs(),
            "Circuit breaker initialized"
        );
        Self {
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
            state: Mutex::new(BreakerState {
                current: CircuitState::Closed,
                failure_count: 0,
                last_failure: None,
                last_failure_wall: None,
                trial_in_flight: false,
            }),
        }
    }

    /// Run `operation` if the breaker admits it, recording the outcome.
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut admission = self.admit().map_err(BreakerError::Open)?;

        let result = operation().await;

        admission.settled = true;
        match &result {
            Ok(_) => self.record_success(admission.trial),
            Err(_) => self.record_failure(admission.trial),
        }
        drop(admission);

        result.map_err(BreakerError::Failed)
    }

    pub fn state(&self) -> CircuitState {
        self.state.lock().current
    }

    pub fn failure_count(&self) -> u32 {
        self.state.lock().failure_count
    }

    pub fn get_state_info(&self) -> CircuitStateInfo {
        let state = self.state.lock();
        CircuitStateInfo {
            state: state.current,
            failure_count: state.failure_count,
            failure_threshold: self.failure_threshold,
            last_failure_time: state.last_failure_wall,
            recovery_timeout_secs: self.recovery_timeout.as_secs(),
            is_operational: state.current != CircuitState::Open,
        }
    }

    fn admit(&self) -> Result<Admission<'_>, CircuitOpenError> {
        let mut state = self.state.lock();

        match state.current {
            CircuitState::Closed => Ok(Admission::regular(self)),
            CircuitState::Open => {
                let elapsed = state
                    .last_failure
                    .map(|at| at.elapsed())
                    .unwrap_or(self.recovery_timeout);

                if elapsed >= self.recovery_timeout {
                    tracing::info!("Circuit breaker: Open → HalfOpen, admitting trial call");
                    state.current = CircuitState::HalfOpen;
                    state.trial_in_flight = true;
                    metrics::record_circuit_state(CircuitState::HalfOpen);
                    Ok(Admission::trial(self))
                } else {
                    tracing::warn!(
                        failure_count = state.failure_count,
                        "Circuit breaker open, rejecting call"
                    );
                    metrics::record_circuit_rejection();
                    Err(CircuitOpenError {
                        failure_count: state.failure_count,
                        retry_after: self.recovery_timeout - elapsed,
                    })
                }
            }
            CircuitState::HalfOpen => {
                if state.trial_in_flight {
                    tracing::debug!("Circuit breaker half-open with trial in flight, rejecting call");
                    metrics::record_circuit_rejection();
                    Err(CircuitOpenError {
                        failure_count: state.failure_count,
                        retry_after: Duration::ZERO,
                    })
                } else {
                    state.trial_in_flight = true;
                    Ok(Admission::trial(self))
                }
            }
        }
    }

    fn record_success(&self, trial: bool) {
        let mut state = self.state.lock();

        if state.current == CircuitState::HalfOpen {
            tracing::info!("Circuit breaker: HalfOpen → Closed, dependency recovered");
            state.current = CircuitState::Closed;
            metrics::record_circuit_state(CircuitState::Closed);
        } else if state.failure_count > 0 {
            tracing::info!(
                previous_failures = state.failure_count,
                "Circuit breaker: success observed, resetting failure count"
            );
        }

        state.failure_count = 0;
        state.last_failure = None;
        state.last_failure_wall = None;
        if trial {
            state.trial_in_flight = false;
        }
    }

    fn record_failure(&self, trial: bool) {
        let mut state = self.state.lock();

        state.failure_count = state.failure_count.saturating_add(1);
        state.last_failure = Some(Instant::now());
        state.last_failure_wall = Some(SystemTime::now());
        if trial {
            state.trial_in_flight = false;
        }

        tracing::debug!(failure_count = state.failure_count, "Circuit breaker: failure recorded");

        let should_open = state.current == CircuitState::HalfOpen
            || state.failure_count >= self.failure_threshold;
        if should_open && state.current != CircuitState::Open {
            tracing::warn!(
                from = state.current.as_str(),
                failure_count = state.failure_count,
                "Circuit breaker: opening circuit"
            );
            state.current = CircuitState::Open;
            metrics::record_circuit_state(CircuitState::Open);
        }
    }

    fn release_trial(&self) {
        let mut state = self.state.lock();
        if state.trial_in_flight {
            tracing::debug!("Circuit breaker: trial call abandoned, releasing slot");
            state.trial_in_flight = false;
        }
    }
}

/// Permission to run one call. A trial permit dropped before its outcome is recorded
/// (the caller's future was cancelled) frees the half-open slot.
struct Admission<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> Admission<'a> {
    fn regular(breaker: &'a CircuitBreaker) -> Self {
        Self {
            breaker,
            trial: false,
            settled: false,
        }
    }

    fn trial(breaker: &'a CircuitBreaker) -> Self {
        Self {
            breaker,
            trial: true,
            settled: false,
        }
    }
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        if self.trial && !self.settled {
            self.breaker.release_trial();
        }
    }
}
