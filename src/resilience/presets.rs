//! Preset configurations for the two dependencies the engine was tuned against.

use crate::config::{HealthCheckConfig, RetryConfig};
use crate::health::ProbeError;
use crate::resilience::fault::FaultKind;
use crate::resilience::retries::RetryOrchestrator;

/// Local automation-control HTTP API
///
/// - 10 attempts, 1s → 30s, base 2.0, jittered
/// - Circuit breaker: 5 failures, 30s recovery
/// - Health probe every 10s
/// - Retries connection, timeout, HTTP status and OS-level I/O faults
pub fn automation_api_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 10,
        base_delay_secs: 1.0,
        max_delay_secs: 30.0,
        exponential_base: 2.0,
        jitter: true,
        timeout_secs: 30.0,
        circuit_breaker_enabled: true,
        circuit_failure_threshold: 5,
        circuit_recovery_timeout_secs: 30,
        health_check_interval_secs: 10,
        retry_on: [
            FaultKind::Connection,
            FaultKind::Timeout,
            FaultKind::HttpStatus,
            FaultKind::ConnectionRefused,
            FaultKind::Io,
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    }
}

/// Remote browser-driver endpoint
///
/// - 5 attempts, 2s → 20s, base 1.5, jittered
/// - No circuit breaker (driver sessions fail per-command, not per-service)
/// - Retries driver, timeout, missing-element and refused-connection faults
pub fn browser_driver_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 5,
        base_delay_secs: 2.0,
        max_delay_secs: 20.0,
        exponential_base: 1.5,
        jitter: true,
        timeout_secs: 60.0,
        circuit_breaker_enabled: false,
        retry_on: [
            FaultKind::Driver,
            FaultKind::Timeout,
            FaultKind::ElementNotFound,
            FaultKind::ConnectionRefused,
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    }
}

/// Orchestrator for the automation API with HTTP health monitoring of `api_url` running.
pub async fn automation_api_orchestrator(api_url: &str) -> Result<RetryOrchestrator, ProbeError> {
    let orchestrator =
        RetryOrchestrator::new(automation_api_config()).with_health_check_config(HealthCheckConfig {
            url: Some(api_url.to_string()),
            ..Default::default()
        });
    orchestrator.setup_http_health_monitoring(api_url).await?;
    Ok(orchestrator)
}
