//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Fixed interval timer
//!     → probe.rs (HTTP GET or custom probe, under a short timeout)
//!     → state.rs (streak counters, totals, bounded history)
//!
//! Readers:
//!     → HealthChecker::get_status / get_history
//!     → RetryOrchestrator::get_system_status
//! ```
//!
//! # Design Decisions
//! - Purely advisory: probe failures are recorded, never raised
//! - Independent of application traffic; the retry loop never consults it
//! - The state lock is never held across a probe

pub mod active;
pub mod probe;
pub mod state;

pub use active::{HealthChecker, HealthCheckerSettings};
pub use probe::{probe_fn, FnProbe, HealthProbe, HttpProbe, ProbeError};
pub use state::{HealthRecord, HealthStatus};
