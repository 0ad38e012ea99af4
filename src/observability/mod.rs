//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resilience/ and health/ produce:
//!     → tracing events (structured fields, one span per retried call)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (binary only)
//!     → Prometheus scrape endpoint (binary only, optional)
//! ```
//!
//! # Design Decisions
//! - The library emits, the binary decides where events and metrics go
//! - Each retried call carries a UUID call id for correlation

pub mod logging;
pub mod metrics;
