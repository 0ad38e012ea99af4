//! resilience-engine operator CLI
//!
//! ```text
//!   fetch   --url <URL>   GET through the retry orchestrator, print system status
//!   monitor --url <URL>   run the health prober until Ctrl-C, print health status
//! ```

use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use resilience_engine::config::{load_config, EngineConfig};
use resilience_engine::lifecycle::signals::wait_for_signal;
use resilience_engine::observability::{logging, metrics};
use resilience_engine::{Classify, FaultKind, RetryOrchestrator};

#[derive(Parser)]
#[command(name = "resilience-engine")]
#[command(about = "Retry, circuit breaking and health probing for flaky HTTP dependencies", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a URL with retries and print the resulting system status
    Fetch {
        #[arg(short, long)]
        url: String,
    },
    /// Probe a dependency until interrupted
    Monitor {
        #[arg(short, long)]
        url: String,

        /// Override the probe interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),
}

impl Classify for FetchError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            FetchError::Request(e) => e.fault_kind(),
            FetchError::Status(status) if status.is_server_error() => FaultKind::HttpStatus,
            FetchError::Status(status) if *status == StatusCode::TOO_MANY_REQUESTS => FaultKind::HttpStatus,
            FetchError::Status(_) => FaultKind::Other,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("resilience-engine v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::Fetch { url } => fetch(config, &url).await,
        Commands::Monitor { url, interval } => monitor(config, &url, interval).await,
    }
}

async fn fetch(config: EngineConfig, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = RetryOrchestrator::new(config.retry).with_health_check_config(config.health_check.clone());
    if config.health_check.enabled {
        if let Some(target) = &config.health_check.url {
            orchestrator.setup_http_health_monitoring(target).await?;
        }
    }

    let client = reqwest::Client::builder()
        .timeout(orchestrator.config().timeout())
        .build()?;

    let result = orchestrator
        .execute_named("fetch", || {
            let request = client.get(url);
            async move {
                let response = request.send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status));
                }
                Ok(response.bytes().await?)
            }
        })
        .await;

    let status = orchestrator.get_system_status();
    orchestrator.cleanup().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    match result {
        Ok(body) => {
            println!("fetched {} bytes from {}", body.len(), url);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(e.into())
        }
    }
}

async fn monitor(
    mut config: EngineConfig,
    url: &str,
    interval: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(secs) = interval {
        config.retry.health_check_interval_secs = secs.max(1);
    }

    let orchestrator = RetryOrchestrator::new(config.retry).with_health_check_config(config.health_check);
    orchestrator.setup_http_health_monitoring(url).await?;

    wait_for_signal().await;
    orchestrator.cleanup().await;

    let report = serde_json::json!({
        "status": orchestrator.get_health_status(),
        "history": orchestrator.get_health_history(10),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
