//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Caller operation:
//!     → retries.rs (attempt loop, fault classification via fault.rs)
//!     → circuit_breaker.rs (gate admission, track failure streak)
//!     → operation
//!     → on retryable failure: backoff.rs delay, sleep, next attempt
//!     → every attempt recorded in history.rs
//! ```
//!
//! # Design Decisions
//! - Only the configured fault kinds are retried; everything else surfaces at once
//! - A circuit-open rejection ends the current call without further attempts
//! - Errors are never logged and swallowed; exactly one outcome per call

pub mod backoff;
pub mod circuit_breaker;
pub mod error;
pub mod fault;
pub mod history;
pub mod presets;
pub mod retries;

pub use backoff::ExponentialBackoff;
pub use circuit_breaker::{CircuitBreaker, CircuitState, CircuitStateInfo};
pub use error::{BreakerError, CircuitOpenError, RetryError};
pub use fault::{Classify, FaultKind};
pub use retries::{with_retry, RetryAttempt, RetryOrchestrator, RetryStats, RetryStrategy, SystemStatus};
