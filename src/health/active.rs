//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe one dependency from a background task
//! - Record every outcome into the shared health state
//! - Serve advisory snapshots to operators

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::config::HealthCheckConfig;
use crate::health::probe::{HealthProbe, ProbeError};
use crate::health::state::{HealthRecord, HealthState, HealthStatus};
use crate::observability::metrics;

/// Upper bound on how long `stop` waits for the loop to exit.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Shortest pause between two probes.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Settings for one [`HealthChecker`].
#[derive(Debug, Clone)]
pub struct HealthCheckerSettings {
    pub interval: Duration,
    pub probe_timeout: Duration,
    pub unhealthy_threshold: u32,
    pub history_capacity: usize,
}

impl HealthCheckerSettings {
    pub fn from_config(interval: Duration, config: &HealthCheckConfig) -> Self {
        Self {
            interval,
            probe_timeout: config.timeout(),
            unhealthy_threshold: config.unhealthy_threshold,
            history_capacity: config.history_capacity,
        }
    }
}

impl Default for HealthCheckerSettings {
    fn default() -> Self {
        Self::from_config(Duration::from_secs(10), &HealthCheckConfig::default())
    }
}

struct CheckerInner {
    probe: Box<dyn HealthProbe>,
    settings: HealthCheckerSettings,
    running: AtomicBool,
    state: Mutex<HealthState>,
    stop_tx: watch::Sender<bool>,
}

/// Background prober for a single dependency.
pub struct HealthChecker {
    inner: Arc<CheckerInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HealthChecker {
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn new(probe: impl HealthProbe, mut settings: HealthCheckerSettings) -> Self {
        settings.interval = settings.interval.max(MIN_INTERVAL);
        tracing::info!(
            target_url = %probe.target(),
            interval_secs = settings.interval.as_secs(),
            "Health checker initialized"
        );
        Self {
            inner: Arc::new(CheckerInner {
                state: Mutex::new(HealthState::new(settings.history_capacity)),
                probe: Box::new(probe),
                settings,
                running: AtomicBool::new(false),
                stop_tx: watch::channel(false).0,
            }),
            task: Mutex::new(None),
        }
    }

    /// Spawn the monitoring loop. Must be called inside a tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if self.inner.running.load(Ordering::SeqCst) {
            tracing::warn!("Health checker already running");
            return;
        }

        self.inner.running.store(true, Ordering::SeqCst);
        self.inner.stop_tx.send_replace(false);
        let stop_rx = self.inner.stop_tx.subscribe();
        let inner = self.inner.clone();
        *task = Some(tokio::spawn(monitoring_loop(inner, stop_rx)));

        tracing::info!("Health monitoring started");
    }

    /// Stop the loop and wait up to [`STOP_TIMEOUT`] for it to exit.
    pub async fn stop(&self) {
        let handle = {
            let mut task = self.task.lock();
            if !self.inner.running.swap(false, Ordering::SeqCst) {
                return;
            }
            self.inner.stop_tx.send_replace(true);
            task.take()
        };

        if let Some(mut handle) = handle {
            match time::timeout(STOP_TIMEOUT, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "Health monitoring task failed"),
                Err(_) => {
                    tracing::warn!("Health monitoring task did not stop in time, aborting");
                    handle.abort();
                }
            }
        }

        tracing::info!("Health monitoring stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Run one probe now and record the outcome.
    pub async fn perform_check(&self) -> bool {
        self.inner.perform_check().await
    }

    pub fn get_status(&self) -> HealthStatus {
        let state = self.inner.state.lock();
        state.snapshot(
            self.is_running(),
            self.inner.probe.target(),
            self.inner.settings.unhealthy_threshold,
            self.inner.settings.interval,
        )
    }

    /// The last `last_n` records, most recent last.
    pub fn get_history(&self, last_n: usize) -> Vec<HealthRecord> {
        self.inner.state.lock().history(last_n)
    }
}

impl Drop for HealthChecker {
    fn drop(&mut self) {
        if self.inner.running.swap(false, Ordering::SeqCst) {
            self.inner.stop_tx.send_replace(true);
        }
    }
}

impl CheckerInner {
    async fn perform_check(&self) -> bool {
        let started = Instant::now();
        let outcome = match time::timeout(self.settings.probe_timeout, self.probe.check()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.settings.probe_timeout)),
        };
        let duration = started.elapsed();

        let success = outcome.is_ok();
        let error = outcome.err().map(|e| e.to_string());

        match &error {
            None => tracing::debug!(duration_ms = duration.as_millis() as u64, "Health check ok"),
            Some(e) => tracing::warn!(
                target_url = %self.probe.target(),
                error = %e,
                duration_ms = duration.as_millis() as u64,
                "Health check failed"
            ),
        }

        let consecutive_failures = {
            let mut state = self.state.lock();
            state.record(success, duration, error);
            state.consecutive_failures()
        };
        metrics::record_health_check(success, duration, consecutive_failures);

        success
    }
}

async fn monitoring_loop(inner: Arc<CheckerInner>, mut stop_rx: watch::Receiver<bool>) {
    tracing::debug!("Health monitoring loop entered");

    while inner.running.load(Ordering::SeqCst) {
        tokio::select! {
            _ = inner.perform_check() => {}
            _ = stop_rx.wait_for(|stop| *stop) => break,
        }

        tokio::select! {
            _ = time::sleep(inner.settings.interval) => {}
            _ = stop_rx.wait_for(|stop| *stop) => break,
        }
    }

    tracing::debug!("Health monitoring loop exited");
}
