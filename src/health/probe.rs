//! Probe implementations.
//!
//! # Responsibilities
//! - Define the minimal boolean-success probe contract
//! - Provide an HTTP probe and a closure adapter
//!
//! # Design Decisions
//! - Any transport error or non-2xx status is a failure
//! - The probe does not enforce its own deadline; the checker wraps it in one

use futures_util::future::BoxFuture;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::HealthCheckConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid probe target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
}

/// One low-cost availability check against a dependency.
pub trait HealthProbe: Send + Sync + 'static {
    fn check(&self) -> BoxFuture<'_, Result<(), ProbeError>>;

    /// Short human-readable target description for logs.
    fn target(&self) -> String {
        "custom".to_string()
    }
}

/// GET `{base}{path}` and expect a 2xx answer.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: Url,
    user_agent: String,
}

impl HttpProbe {
    pub fn new(base_url: &str, path: &str, user_agent: &str) -> Result<Self, ProbeError> {
        let invalid = |reason: String| ProbeError::InvalidTarget {
            target: format!("{}{}", base_url, path),
            reason,
        };

        let base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        let url = join_path(&base, path).map_err(|e| invalid(e.to_string()))?;
        let client = reqwest::Client::builder()
            .no_proxy()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            url,
            user_agent: user_agent.to_string(),
        })
    }

    pub fn from_config(base_url: &str, config: &HealthCheckConfig) -> Result<Self, ProbeError> {
        Self::new(base_url, &config.path, &config.user_agent)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    if path.is_empty() {
        return Ok(base.clone());
    }
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined)
}

impl HealthProbe for HttpProbe {
    fn check(&self) -> BoxFuture<'_, Result<(), ProbeError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.url.clone())
                .header(reqwest::header::USER_AGENT, &self.user_agent)
                .send()
                .await
                .map_err(|e| ProbeError::Transport(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(ProbeError::Status(status.as_u16()))
            }
        })
    }

    fn target(&self) -> String {
        self.url.to_string()
    }
}

/// Probe backed by an async closure.
pub struct FnProbe<F> {
    f: F,
}

/// Wrap an async closure as a [`HealthProbe`].
pub fn probe_fn<F, Fut>(f: F) -> FnProbe<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProbeError>> + Send + 'static,
{
    FnProbe { f }
}

impl<F, Fut> HealthProbe for FnProbe<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProbeError>> + Send + 'static,
{
    fn check(&self) -> BoxFuture<'_, Result<(), ProbeError>> {
        Box::pin((self.f)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_probe_url_join() {
        let probe = HttpProbe::new("http://localhost:50325", "/status", "test").unwrap();
        assert_eq!(probe.url().as_str(), "http://localhost:50325/status");

        let probe = HttpProbe::new("http://localhost:50325/api/", "status", "test").unwrap();
        assert_eq!(probe.url().as_str(), "http://localhost:50325/api/status");

        let probe = HttpProbe::new("http://localhost:4444", "", "test").unwrap();
        assert_eq!(probe.target(), "http://localhost:4444/");
    }

    #[test]
    fn test_http_probe_rejects_bad_target() {
        let err = HttpProbe::new("localhost without scheme", "/status", "test").unwrap_err();
        assert!(matches!(err, ProbeError::InvalidTarget { .. }));
    }

    #[tokio::test]
    async fn test_fn_probe() {
        let ok = probe_fn(|| async { Ok(()) });
        assert!(ok.check().await.is_ok());

        let down = probe_fn(|| async { Err(ProbeError::Status(503)) });
        assert_eq!(down.check().await, Err(ProbeError::Status(503)));
        assert_eq!(down.target(), "custom");
    }
}
