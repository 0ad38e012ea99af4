//! Lifecycle management.
//!
//! # Responsibilities
//! - OS signal handling for the operator binary (signals.rs)
//!
//! # Design Decisions
//! - Background loops own their stop channel; this module only covers process signals

pub mod signals;
