//! Error types produced by the resilience engine.

use std::time::Duration;
use thiserror::Error;

/// Raised when an open circuit rejects a call without running it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circuit breaker is open after {failure_count} failures, next trial in {retry_after:?}")]
pub struct CircuitOpenError {
    /// Failure streak recorded when the call was rejected.
    pub failure_count: u32,
    /// Time left until the breaker admits a trial call. Zero while a trial is in flight.
    pub retry_after: Duration,
}

/// Outcome of a call routed through a [`CircuitBreaker`](super::CircuitBreaker).
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker rejected the call; the operation was not invoked.
    #[error(transparent)]
    Open(CircuitOpenError),

    /// The operation ran and failed. The error is passed through untouched.
    #[error("{0}")]
    Failed(E),
}

/// Terminal failure of [`RetryOrchestrator::execute_with_retry`](super::RetryOrchestrator::execute_with_retry).
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The circuit breaker rejected the call. Not retried within this invocation.
    #[error(transparent)]
    CircuitOpen(#[from] CircuitOpenError),

    /// Every attempt failed with a retryable fault.
    #[error("all {attempts} attempts failed after {elapsed:?}; last error: {last_error}")]
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        last_error: E,
    },

    /// The operation failed with a fault outside the retryable set.
    #[error("{0}")]
    Fatal(E),
}

impl<E> RetryError<E> {
    /// The underlying operation error, if the operation ran at all.
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            RetryError::CircuitOpen(_) => None,
            RetryError::Exhausted { last_error, .. } => Some(last_error),
            RetryError::Fatal(e) => Some(e),
        }
    }

    pub fn into_operation_error(self) -> Option<E> {
        match self {
            RetryError::CircuitOpen(_) => None,
            RetryError::Exhausted { last_error, .. } => Some(last_error),
            RetryError::Fatal(e) => Some(e),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    pub fn is_circuit_open(&self) -> bool {
        matches!(self, RetryError::CircuitOpen(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: RetryError<String> = RetryError::Exhausted {
            attempts: 3,
            elapsed: Duration::from_secs(3),
            last_error: "connection reset".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("all 3 attempts failed"));
        assert!(text.contains("connection reset"));

        let open = CircuitOpenError {
            failure_count: 5,
            retry_after: Duration::from_secs(12),
        };
        let err: RetryError<String> = open.clone().into();
        assert!(err.is_circuit_open());
        assert_eq!(err.to_string(), open.to_string());
        assert!(err.operation_error().is_none());
    }
}
