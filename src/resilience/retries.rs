//! Retry orchestration.
//!
//! # Responsibilities
//! - Drive the per-call attempt loop (optionally through the circuit breaker)
//! - Classify failures: retryable kinds back off and retry, everything else surfaces
//! - Record every attempt into a bounded history and aggregate it on demand
//! - Own the optional health prober and its lifecycle
//!
//! # Per-call state machine
//! ```text
//! ATTEMPTING(1) → SUCCESS
//!               → BACKING_OFF → ATTEMPTING(n + 1)
//!               → FATAL        (fault outside the retryable set, or circuit open)
//!               → EXHAUSTED    (max_attempts retryable failures)
//! ```
//!
//! # Design Decisions
//! - Attempts of one call run sequentially on the caller's task; the backoff sleep is
//!   the only suspension point besides the operation itself
//! - No sleep after the final attempt
//! - `RetryConfig::timeout_secs` is reported, not enforced; operations own their deadlines
//! - Statistics are recomputed from the history on every read

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::{self, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::validation::validate_retry_config;
use crate::config::{ConfigError, HealthCheckConfig, RetryConfig};
use crate::health::state::round2;
use crate::health::{
    HealthChecker, HealthCheckerSettings, HealthProbe, HealthRecord, HealthStatus, HttpProbe, ProbeError,
};
use crate::observability::metrics;
use crate::resilience::backoff::ExponentialBackoff;
use crate::resilience::circuit_breaker::{CircuitBreaker, CircuitStateInfo};
use crate::resilience::error::{BreakerError, RetryError};
use crate::resilience::fault::{Classify, FaultKind};
use crate::resilience::history::BoundedHistory;

/// Attempts summarised in [`RetryStats::last_attempts`].
const RECENT_ATTEMPTS: usize = 10;

/// How a failed attempt was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    StandardRetry,
    NoRetry,
}

/// One recorded attempt.
#[derive(Debug, Clone, Serialize)]
pub struct RetryAttempt {
    pub call_id: Uuid,
    /// 1-based within its call.
    pub attempt_number: u32,
    pub timestamp: SystemTime,
    pub duration: Duration,
    pub error: Option<String>,
    pub fault_kind: Option<FaultKind>,
    pub success: bool,
    /// Delay slept after this attempt before the next one. Zero when no retry followed.
    pub backoff_delay: Duration,
    pub strategy: RetryStrategy,
    pub details: BTreeMap<String, serde_json::Value>,
}

impl RetryAttempt {
    fn new(call_id: Uuid, attempt_number: u32, duration: Duration, strategy: RetryStrategy) -> Self {
        Self {
            call_id,
            attempt_number,
            timestamp: SystemTime::now(),
            duration,
            error: None,
            fault_kind: None,
            success: false,
            backoff_delay: Duration::ZERO,
            strategy,
            details: BTreeMap::new(),
        }
    }

    fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptSummary {
    pub attempt: u32,
    pub timestamp: SystemTime,
    pub success: bool,
    pub duration_secs: f64,
    pub error: Option<String>,
    pub backoff_delay_secs: f64,
}

/// Aggregate over the attempt history.
#[derive(Debug, Clone, Serialize)]
pub struct RetryStats {
    pub total_attempts: usize,
    pub successful_attempts: usize,
    pub failed_attempts: usize,
    /// Percentage, two decimals.
    pub success_rate: f64,
    pub average_duration_secs: f64,
    pub total_backoff_secs: f64,
    pub last_attempts: Vec<AttemptSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub max_attempts: u32,
    pub base_delay_secs: f64,
    pub max_delay_secs: f64,
    pub timeout_secs: f64,
    pub circuit_breaker_enabled: bool,
    pub retry_on: BTreeSet<FaultKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetryManagerStatus {
    pub config: ConfigSummary,
    pub stats: RetryStats,
}

/// Everything an operator may want to look at, in one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub retry_manager: RetryManagerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker: Option<CircuitStateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_checker: Option<HealthStatus>,
}

/// Entry point of the engine: runs operations with backoff, circuit breaking and
/// attempt bookkeeping.
pub struct RetryOrchestrator {
    config: RetryConfig,
    health_config: HealthCheckConfig,
    backoff: ExponentialBackoff,
    circuit_breaker: Option<CircuitBreaker>,
    health_checker: Mutex<Option<Arc<HealthChecker>>>,
    history: Mutex<BoundedHistory<RetryAttempt>>,
}

impl RetryOrchestrator {
    /// Build an orchestrator without validating. Zero values of `max_attempts`,
    /// `health_check_interval_secs` and `history_capacity` are raised to one; use
    /// [`try_new`](Self::try_new) to reject them instead.
    pub fn new(mut config: RetryConfig) -> Self {
        config.max_attempts = config.max_attempts.max(1);
        config.health_check_interval_secs = config.health_check_interval_secs.max(1);
        config.history_capacity = config.history_capacity.max(1);

        let circuit_breaker = config.circuit_breaker_enabled.then(|| {
            CircuitBreaker::new(
                config.circuit_failure_threshold,
                config.circuit_recovery_timeout(),
            )
        });

        tracing::info!(
            max_attempts = config.max_attempts,
            base_delay_secs = config.base_delay_secs,
            max_delay_secs = config.max_delay_secs,
            exponential_base = config.exponential_base,
            circuit_breaker = config.circuit_breaker_enabled,
            "Retry orchestrator initialized"
        );

        Self {
            backoff: ExponentialBackoff::from_config(&config),
            history: Mutex::new(BoundedHistory::new(config.history_capacity)),
            health_config: HealthCheckConfig::default(),
            health_checker: Mutex::new(None),
            circuit_breaker,
            config,
        }
    }

    /// Validate `config` first.
    pub fn try_new(config: RetryConfig) -> Result<Self, ConfigError> {
        validate_retry_config(&config).map_err(ConfigError::Validation)?;
        Ok(Self::new(config))
    }

    /// Settings used by [`setup_health_monitoring`](Self::setup_health_monitoring).
    pub fn with_health_check_config(mut self, health_config: HealthCheckConfig) -> Self {
        self.health_config = health_config;
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn circuit_breaker(&self) -> Option<&CircuitBreaker> {
        self.circuit_breaker.as_ref()
    }

    /// Run `operation` until it succeeds, fails fatally, or runs out of attempts.
    pub async fn execute_with_retry<F, Fut, T, E>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
    {
        self.execute_named("operation", operation).await
    }

    /// Same as [`execute_with_retry`](Self::execute_with_retry), with a name for logs.
    pub async fn execute_named<F, Fut, T, E>(&self, name: &str, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
    {
        let call_id = Uuid::new_v4();
        let span = tracing::info_span!("retry", operation = name, call_id = %call_id);
        self.run_attempts(call_id, operation).instrument(span).await
    }

    async fn run_attempts<F, Fut, T, E>(&self, call_id: Uuid, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
    {
        let started = Instant::now();
        let max_attempts = self.config.max_attempts;
        let mut attempt: u32 = 1;

        tracing::debug!(max_attempts, timeout_secs = self.config.timeout_secs, "Starting call");

        loop {
            tracing::debug!(attempt, max_attempts, "Attempt starting");
            let attempt_started = Instant::now();

            let outcome = match &self.circuit_breaker {
                Some(breaker) => breaker.call(|| operation()).await,
                None => operation().await.map_err(BreakerError::Failed),
            };
            let duration = attempt_started.elapsed();

            let error = match outcome {
                Ok(value) => {
                    let total = started.elapsed();
                    let mut record = RetryAttempt::new(call_id, attempt, duration, RetryStrategy::StandardRetry)
                        .detail("total_duration_secs", total.as_secs_f64());
                    record.success = true;
                    self.record(record);
                    metrics::record_attempt("success");

                    tracing::info!(
                        attempt,
                        duration_ms = duration.as_millis() as u64,
                        total_ms = total.as_millis() as u64,
                        "Call succeeded"
                    );
                    return Ok(value);
                }
                Err(BreakerError::Open(open)) => {
                    let mut record = RetryAttempt::new(call_id, attempt, duration, RetryStrategy::NoRetry)
                        .detail("circuit_open", true)
                        .detail("non_retryable", true);
                    record.error = Some(open.to_string());
                    self.record(record);
                    metrics::record_attempt("rejected");

                    tracing::error!(attempt, error = %open, "Call rejected by circuit breaker");
                    return Err(RetryError::CircuitOpen(open));
                }
                Err(BreakerError::Failed(error)) => error,
            };

            let kind = error.fault_kind();
            if !self.config.is_retryable(kind) {
                let mut record = RetryAttempt::new(call_id, attempt, duration, RetryStrategy::NoRetry)
                    .detail("error_type", kind.as_str())
                    .detail("non_retryable", true);
                record.error = Some(error.to_string());
                record.fault_kind = Some(kind);
                self.record(record);
                metrics::record_attempt("fatal");

                tracing::error!(
                    attempt,
                    fault = %kind,
                    error = %error,
                    "Non-retryable failure, aborting"
                );
                return Err(RetryError::Fatal(error));
            }

            let delay = (attempt < max_attempts).then(|| self.backoff.calculate_delay(attempt - 1));

            let mut record = RetryAttempt::new(call_id, attempt, duration, RetryStrategy::StandardRetry)
                .detail("error_type", kind.as_str());
            record.error = Some(error.to_string());
            record.fault_kind = Some(kind);
            record.backoff_delay = delay.unwrap_or_default();
            self.record(record);
            metrics::record_attempt("retryable_failure");

            tracing::warn!(
                attempt,
                max_attempts,
                fault = %kind,
                error = %error,
                duration_ms = duration.as_millis() as u64,
                "Attempt failed"
            );

            match delay {
                Some(delay) => {
                    tracing::warn!(delay_ms = delay.as_millis() as u64, "Backing off before next attempt");
                    metrics::record_backoff(delay);
                    time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    let elapsed = started.elapsed();
                    metrics::record_retry_exhausted();
                    tracing::error!(
                        attempts = max_attempts,
                        elapsed_ms = elapsed.as_millis() as u64,
                        last_error = %error,
                        "Retries exhausted"
                    );
                    return Err(RetryError::Exhausted {
                        attempts: max_attempts,
                        elapsed,
                        last_error: error,
                    });
                }
            }
        }
    }

    fn record(&self, attempt: RetryAttempt) {
        self.history.lock().push(attempt);
    }

    /// The last `last_n` attempt records, most recent last.
    pub fn get_attempt_history(&self, last_n: usize) -> Vec<RetryAttempt> {
        self.history.lock().last(last_n)
    }

    pub fn get_retry_stats(&self) -> RetryStats {
        let history = self.history.lock();

        let total_attempts = history.len();
        let successful_attempts = history.iter().filter(|a| a.success).count();
        let total_duration: f64 = history.iter().map(|a| a.duration.as_secs_f64()).sum();
        let total_backoff: f64 = history.iter().map(|a| a.backoff_delay.as_secs_f64()).sum();

        let (success_rate, average_duration) = if total_attempts == 0 {
            (0.0, 0.0)
        } else {
            (
                successful_attempts as f64 / total_attempts as f64 * 100.0,
                total_duration / total_attempts as f64,
            )
        };

        let last_attempts = history
            .iter()
            .skip(total_attempts.saturating_sub(RECENT_ATTEMPTS))
            .map(|a| AttemptSummary {
                attempt: a.attempt_number,
                timestamp: a.timestamp,
                success: a.success,
                duration_secs: round2(a.duration.as_secs_f64()),
                error: a.error.clone(),
                backoff_delay_secs: round2(a.backoff_delay.as_secs_f64()),
            })
            .collect();

        RetryStats {
            total_attempts,
            successful_attempts,
            failed_attempts: total_attempts - successful_attempts,
            success_rate: round2(success_rate),
            average_duration_secs: round2(average_duration),
            total_backoff_secs: round2(total_backoff),
            last_attempts,
        }
    }

    pub fn get_system_status(&self) -> SystemStatus {
        SystemStatus {
            retry_manager: RetryManagerStatus {
                config: ConfigSummary {
                    max_attempts: self.config.max_attempts,
                    base_delay_secs: self.config.base_delay_secs,
                    max_delay_secs: self.config.max_delay_secs,
                    timeout_secs: self.config.timeout_secs,
                    circuit_breaker_enabled: self.config.circuit_breaker_enabled,
                    retry_on: self.config.retry_on.clone(),
                },
                stats: self.get_retry_stats(),
            },
            circuit_breaker: self.circuit_breaker.as_ref().map(|b| b.get_state_info()),
            health_checker: self.get_health_status(),
        }
    }

    /// Replace any running prober with one driving `probe`, and start it.
    pub async fn setup_health_monitoring(&self, probe: impl HealthProbe) {
        let previous = self.health_checker.lock().take();
        if let Some(previous) = previous {
            previous.stop().await;
        }

        let settings = HealthCheckerSettings::from_config(
            self.config.health_check_interval(),
            &self.health_config,
        );
        let checker = Arc::new(HealthChecker::new(probe, settings));
        checker.start();
        *self.health_checker.lock() = Some(checker);
    }

    /// HTTP probe against `base_url` using the health-check settings.
    pub async fn setup_http_health_monitoring(&self, base_url: &str) -> Result<(), ProbeError> {
        let probe = HttpProbe::from_config(base_url, &self.health_config)?;
        self.setup_health_monitoring(probe).await;
        tracing::info!(base_url, "HTTP health monitoring configured");
        Ok(())
    }

    pub fn get_health_status(&self) -> Option<HealthStatus> {
        self.health_checker.lock().as_ref().map(|c| c.get_status())
    }

    pub fn get_health_history(&self, last_n: usize) -> Vec<HealthRecord> {
        self.health_checker
            .lock()
            .as_ref()
            .map(|c| c.get_history(last_n))
            .unwrap_or_default()
    }

    /// Stop the health prober, if any. Safe to call repeatedly.
    pub async fn cleanup(&self) {
        let checker = self.health_checker.lock().clone();
        if let Some(checker) = checker {
            checker.stop().await;
        }
        tracing::info!("Retry orchestrator cleaned up");
    }
}

/// Run one operation with a throwaway orchestrator built from `config`.
pub async fn with_retry<F, Fut, T, E>(config: RetryConfig, operation: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify + fmt::Display,
{
    let orchestrator = RetryOrchestrator::new(config);
    let result = orchestrator.execute_with_retry(operation).await;
    orchestrator.cleanup().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::probe_fn;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay_secs: 1.0,
            max_delay_secs: 10.0,
            exponential_base: 2.0,
            jitter: false,
            circuit_breaker_enabled: false,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let orchestrator = RetryOrchestrator::new(quick_config(3));
        let started = Instant::now();

        let value = orchestrator
            .execute_with_retry(|| async { Ok::<_, FaultKind>(42) })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(started.elapsed(), Duration::ZERO);
        let history = orchestrator.get_attempt_history(10);
        assert_eq!(history.len(), 1);
        assert!(history[0].success);
        assert_eq!(history[0].attempt_number, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_fault_is_not_retried() {
        let orchestrator = RetryOrchestrator::new(quick_config(5));
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = orchestrator
            .execute_with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(FaultKind::Other) }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Fatal(FaultKind::Other))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);

        let history = orchestrator.get_attempt_history(10);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].strategy, RetryStrategy::NoRetry);
        assert_eq!(history[0].details["non_retryable"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_has_no_trailing_sleep() {
        let orchestrator = RetryOrchestrator::new(quick_config(4));
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = orchestrator
            .execute_with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(FaultKind::Timeout) }
            })
            .await;

        match result {
            Err(RetryError::Exhausted { attempts, elapsed, last_error }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last_error, FaultKind::Timeout);
                // 1 + 2 + 4 seconds of backoff, nothing after the fourth attempt.
                assert_eq!(elapsed, Duration::from_secs(7));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(7));

        let delays: Vec<_> = orchestrator
            .get_attempt_history(10)
            .iter()
            .map(|a| a.backoff_delay.as_secs())
            .collect();
        assert_eq!(delays, vec![1, 2, 4, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_circuit_open_is_fatal_for_the_call() {
        let config = RetryConfig {
            circuit_breaker_enabled: true,
            circuit_failure_threshold: 2,
            circuit_recovery_timeout_secs: 300,
            ..quick_config(5)
        };
        let orchestrator = RetryOrchestrator::new(config);
        let calls = AtomicU32::new(0);

        let result = orchestrator
            .execute_with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(FaultKind::Connection) }
            })
            .await;

        // Two real failures open the circuit; the third attempt is rejected unrun.
        assert!(matches!(result, Err(RetryError::CircuitOpen(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let history = orchestrator.get_attempt_history(10);
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].details["circuit_open"], true);

        let status = orchestrator.get_system_status();
        let breaker = status.circuit_breaker.unwrap();
        assert!(!breaker.is_operational);
        assert_eq!(breaker.failure_count, 2);
    }

    #[tokio::test]
    async fn test_stats_aggregate_history() {
        let orchestrator = RetryOrchestrator::new(RetryConfig {
            base_delay_secs: 0.1,
            max_delay_secs: 0.1,
            ..quick_config(3)
        });
        let calls = AtomicU32::new(0);

        orchestrator
            .execute_with_retry(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(FaultKind::HttpStatus)
                    } else {
                        Ok(())
                    }
                }
            })
            .await
            .unwrap();

        let stats = orchestrator.get_retry_stats();
        assert_eq!(stats.total_attempts, 2);
        assert_eq!(stats.successful_attempts, 1);
        assert_eq!(stats.failed_attempts, 1);
        assert_eq!(stats.success_rate, 50.0);
        assert_eq!(stats.total_backoff_secs, 0.1);
        assert_eq!(stats.last_attempts.len(), 2);
        assert_eq!(stats.last_attempts[0].error.as_deref(), Some("http_status"));
    }

    #[test]
    fn test_empty_stats() {
        let orchestrator = RetryOrchestrator::new(quick_config(3));
        let stats = orchestrator.get_retry_stats();
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert!(stats.last_attempts.is_empty());

        let status = orchestrator.get_system_status();
        assert!(status.circuit_breaker.is_none());
        assert!(status.health_checker.is_none());
        assert!(orchestrator.get_health_history(5).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised_to_one_second() {
        let orchestrator = RetryOrchestrator::new(RetryConfig {
            max_attempts: 0,
            health_check_interval_secs: 0,
            ..quick_config(3)
        });
        assert_eq!(orchestrator.config().max_attempts, 1);
        assert_eq!(orchestrator.config().health_check_interval_secs, 1);

        let checks = Arc::new(AtomicU32::new(0));
        let counter = checks.clone();
        orchestrator
            .setup_health_monitoring(probe_fn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            }))
            .await;

        // Checks at 0s, 1s, 2s and 3s.
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(checks.load(Ordering::SeqCst), 4);
        assert_eq!(orchestrator.get_health_status().unwrap().check_interval_secs, 1);
        orchestrator.cleanup().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_history_stays_at_capacity() {
        let orchestrator = RetryOrchestrator::new(RetryConfig {
            history_capacity: 3,
            ..quick_config(2)
        });

        for _ in 0..3 {
            let _ = orchestrator
                .execute_with_retry(|| async { Err::<(), _>(FaultKind::Timeout) })
                .await;
        }
        let value = orchestrator
            .execute_with_retry(|| async { Ok::<_, FaultKind>(5) })
            .await
            .unwrap();
        assert_eq!(value, 5);

        // Seven attempts recorded, only the newest three kept.
        let history = orchestrator.get_attempt_history(100);
        assert_eq!(history.len(), 3);
        assert_eq!(
            history.iter().map(|a| a.attempt_number).collect::<Vec<_>>(),
            vec![1, 2, 1]
        );
        assert!(history[2].success);

        let stats = orchestrator.get_retry_stats();
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.successful_attempts, 1);
    }

    #[test]
    fn test_try_new_validates() {
        let err = RetryOrchestrator::try_new(RetryConfig {
            max_attempts: 0,
            ..Default::default()
        });
        assert!(matches!(err, Err(ConfigError::Validation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_monitoring_lifecycle() {
        let orchestrator = RetryOrchestrator::new(quick_config(3));
        orchestrator
            .setup_health_monitoring(probe_fn(|| async { Err(ProbeError::Status(500)) }))
            .await;

        time::sleep(Duration::from_secs(25)).await;
        let status = orchestrator.get_health_status().unwrap();
        assert!(status.is_monitoring);
        assert!(status.consecutive_failures >= 2);
        assert!(!orchestrator.get_health_history(1)[0].success);

        // Replacing the probe starts from a clean slate.
        orchestrator
            .setup_health_monitoring(probe_fn(|| async { Ok(()) }))
            .await;
        time::sleep(Duration::from_secs(1)).await;
        let status = orchestrator.get_health_status().unwrap();
        assert_eq!(status.consecutive_failures, 0);
        assert_eq!(status.total_checks, 1);

        orchestrator.cleanup().await;
        orchestrator.cleanup().await;
        assert!(!orchestrator.get_system_status().health_checker.unwrap().is_monitoring);
    }
}
