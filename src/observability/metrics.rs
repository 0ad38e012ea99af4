//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define engine metrics (attempts, backoff, breaker state, probe results)
//! - Expose a Prometheus-compatible endpoint when the binary asks for one
//!
//! # Metrics
//! - `resilience_attempts_total` (counter): attempts by outcome
//! - `resilience_retries_exhausted_total` (counter): calls that ran out of attempts
//! - `resilience_circuit_rejections_total` (counter): calls refused by an open breaker
//! - `resilience_circuit_state` (gauge): 0=closed, 1=half-open, 2=open
//! - `resilience_backoff_seconds` (histogram): delays slept between attempts
//! - `resilience_health_checks_total` (counter): probes by result
//! - `resilience_health_check_duration_seconds` (histogram): probe latency
//! - `resilience_health_consecutive_failures` (gauge): current failure streak
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed recorder it is a no-op
//! - The library never installs a recorder itself

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::CircuitState;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_attempt(outcome: &'static str) {
    metrics::counter!("resilience_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_backoff(delay: Duration) {
    metrics::histogram!("resilience_backoff_seconds").record(delay.as_secs_f64());
}

pub fn record_retry_exhausted() {
    metrics::counter!("resilience_retries_exhausted_total").increment(1);
}

pub fn record_circuit_rejection() {
    metrics::counter!("resilience_circuit_rejections_total").increment(1);
}

pub fn record_circuit_state(state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfOpen => 1.0,
        CircuitState::Open => 2.0,
    };
    metrics::gauge!("resilience_circuit_state").set(value);
}

pub fn record_health_check(success: bool, duration: Duration, consecutive_failures: u32) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("resilience_health_checks_total", "result" => result).increment(1);
    metrics::histogram!("resilience_health_check_duration_seconds").record(duration.as_secs_f64());
    metrics::gauge!("resilience_health_consecutive_failures").set(consecutive_failures as f64);
}
