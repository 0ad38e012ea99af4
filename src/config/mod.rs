//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EngineConfig (validated, immutable)
//!     → RetryConfig handed to the orchestrator at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once handed out; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::EngineConfig;
pub use schema::HealthCheckConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
