//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays > 0, thresholds >= 1)
//! - Check that the probe target parses as a URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EngineConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use url::Url;

use crate::config::schema::{EngineConfig, HealthCheckConfig, RetryConfig};

/// Upper bound for configured delays: one day.
pub const MAX_DELAY_SECS: f64 = 86_400.0;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the whole configuration.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_retry(&config.retry, &mut errors);
    check_health(&config.health_check, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the retry section alone.
pub fn validate_retry_config(config: &RetryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_retry(config, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_retry(config: &RetryConfig, errors: &mut Vec<ValidationError>) {
    if config.max_attempts == 0 {
        errors.push(ValidationError::new("retry.max_attempts", "must be at least 1"));
    }

    let base_ok = delay_in_range(config.base_delay_secs);
    let max_ok = delay_in_range(config.max_delay_secs);
    if !base_ok {
        errors.push(ValidationError::new(
            "retry.base_delay_secs",
            format!(
                "must be a positive number up to {}, got {}",
                MAX_DELAY_SECS, config.base_delay_secs
            ),
        ));
    }
    if !max_ok {
        errors.push(ValidationError::new(
            "retry.max_delay_secs",
            format!(
                "must be a positive number up to {}, got {}",
                MAX_DELAY_SECS, config.max_delay_secs
            ),
        ));
    }
    if base_ok && max_ok && config.base_delay_secs > config.max_delay_secs {
        errors.push(ValidationError::new(
            "retry.base_delay_secs",
            "must not exceed retry.max_delay_secs",
        ));
    }

    if !config.exponential_base.is_finite() || config.exponential_base < 1.0 {
        errors.push(ValidationError::new(
            "retry.exponential_base",
            format!("must be >= 1.0, got {}", config.exponential_base),
        ));
    }

    if !config.timeout_secs.is_finite() || config.timeout_secs < 0.0 {
        errors.push(ValidationError::new(
            "retry.timeout_secs",
            "must be a non-negative number",
        ));
    }

    if config.circuit_breaker_enabled && config.circuit_failure_threshold == 0 {
        errors.push(ValidationError::new(
            "retry.circuit_failure_threshold",
            "must be at least 1 when the circuit breaker is enabled",
        ));
    }

    if config.health_check_interval_secs == 0 {
        errors.push(ValidationError::new(
            "retry.health_check_interval_secs",
            "must be at least 1",
        ));
    }

    if config.history_capacity == 0 {
        errors.push(ValidationError::new("retry.history_capacity", "must be at least 1"));
    }
}

fn check_health(config: &HealthCheckConfig, errors: &mut Vec<ValidationError>) {
    if config.timeout_secs == 0 {
        errors.push(ValidationError::new("health_check.timeout_secs", "must be at least 1"));
    }
    if config.history_capacity == 0 {
        errors.push(ValidationError::new(
            "health_check.history_capacity",
            "must be at least 1",
        ));
    }
    if let Some(url) = &config.url {
        if let Err(e) = Url::parse(url) {
            errors.push(ValidationError::new(
                "health_check.url",
                format!("invalid URL '{}': {}", url, e),
            ));
        }
    }
}

fn delay_in_range(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= MAX_DELAY_SECS
}
