//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the engine.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::resilience::fault::FaultKind;

/// Root configuration for the resilience engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Retry, backoff and circuit breaker settings.
    pub retry: RetryConfig,

    /// Health probe settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Retry configuration.
///
/// Immutable once handed to a [`RetryOrchestrator`](crate::RetryOrchestrator).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per call, including the first one.
    pub max_attempts: u32,

    /// Delay before the first retry, in seconds.
    pub base_delay_secs: f64,

    /// Upper bound for any single backoff delay, in seconds.
    pub max_delay_secs: f64,

    /// Growth factor applied per attempt.
    pub exponential_base: f64,

    /// Perturb each delay by up to ±10%.
    pub jitter: bool,

    /// Expected per-operation timeout in seconds. Reported in status output only;
    /// each operation enforces its own deadline.
    pub timeout_secs: f64,

    /// Route attempts through a circuit breaker.
    pub circuit_breaker_enabled: bool,

    /// Consecutive failures before the circuit opens.
    pub circuit_failure_threshold: u32,

    /// Seconds an open circuit waits before admitting a trial call.
    pub circuit_recovery_timeout_secs: u64,

    /// Seconds between background health probes.
    pub health_check_interval_secs: u64,

    /// Fault kinds that trigger another attempt.
    pub retry_on: BTreeSet<FaultKind>,

    /// Attempt records kept for statistics.
    pub history_capacity: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay_secs: 1.0,
            max_delay_secs: 60.0,
            exponential_base: 2.0,
            jitter: true,
            timeout_secs: 30.0,
            circuit_breaker_enabled: true,
            circuit_failure_threshold: 5,
            circuit_recovery_timeout_secs: 30,
            health_check_interval_secs: 10,
            retry_on: [FaultKind::Connection, FaultKind::Timeout, FaultKind::HttpStatus]
                .into_iter()
                .collect(),
            history_capacity: 1000,
        }
    }
}

impl RetryConfig {
    pub fn is_retryable(&self, kind: FaultKind) -> bool {
        self.retry_on.contains(&kind)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }

    pub fn circuit_recovery_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_recovery_timeout_secs)
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Start background probing when a target URL is configured.
    pub enabled: bool,

    /// Base URL of the dependency (e.g. "http://localhost:50325").
    pub url: Option<String>,

    /// Path appended to `url` for HTTP probes.
    pub path: String,

    /// Timeout of a single probe in seconds.
    pub timeout_secs: u64,

    /// Consecutive probe failures at which the dependency is reported unhealthy.
    pub unhealthy_threshold: u32,

    /// Probe records kept in the rolling history.
    pub history_capacity: usize,

    /// User-Agent header sent by HTTP probes.
    pub user_agent: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            path: "/status".to_string(),
            timeout_secs: 5,
            unhealthy_threshold: 3,
            history_capacity: 100,
            user_agent: "resilience-engine-health-check".to_string(),
        }
    }
}

impl HealthCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
