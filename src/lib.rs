//! Resilience engine for flaky networked dependencies.
//!
//! Backoff, circuit breaking, fault classification and background health probing
//! around caller-supplied async operations.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{EngineConfig, HealthCheckConfig, RetryConfig};
pub use health::{HealthChecker, HealthProbe, HttpProbe};
pub use resilience::{
    with_retry, CircuitBreaker, CircuitOpenError, Classify, FaultKind, RetryError, RetryOrchestrator,
};
