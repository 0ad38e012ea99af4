//! Fault classification.
//!
//! # Responsibilities
//! - Name the closed set of fault kinds the engine knows about
//! - Let caller errors classify themselves into one of those kinds
//!
//! # Design Decisions
//! - Retry decisions are tag membership checks, never "retry everything"
//! - Unknown failures map to `FaultKind::Other`, which no preset retries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag attached to every failure an operation can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Could not establish or keep a connection.
    Connection,
    /// The operation or a transport step timed out.
    Timeout,
    /// The remote side answered with an error status.
    HttpStatus,
    /// The remote side actively refused the connection.
    ConnectionRefused,
    /// Any other I/O failure.
    Io,
    /// Browser-driver session failure.
    Driver,
    /// A UI element the driver looked for was not present (yet).
    ElementNotFound,
    /// Anything else.
    Other,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::Connection => "connection",
            FaultKind::Timeout => "timeout",
            FaultKind::HttpStatus => "http_status",
            FaultKind::ConnectionRefused => "connection_refused",
            FaultKind::Io => "io",
            FaultKind::Driver => "driver",
            FaultKind::ElementNotFound => "element_not_found",
            FaultKind::Other => "other",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by operation errors so the orchestrator can decide whether to retry.
pub trait Classify {
    fn fault_kind(&self) -> FaultKind;
}

impl Classify for std::io::Error {
    fn fault_kind(&self) -> FaultKind {
        use std::io::ErrorKind;
        match self.kind() {
            ErrorKind::ConnectionRefused => FaultKind::ConnectionRefused,
            ErrorKind::TimedOut | ErrorKind::WouldBlock => FaultKind::Timeout,
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof => FaultKind::Connection,
            _ => FaultKind::Io,
        }
    }
}

impl Classify for reqwest::Error {
    fn fault_kind(&self) -> FaultKind {
        if self.is_timeout() {
            FaultKind::Timeout
        } else if self.is_connect() {
            FaultKind::Connection
        } else if self.is_status() {
            FaultKind::HttpStatus
        } else if self.is_request() || self.is_body() {
            FaultKind::Io
        } else {
            FaultKind::Other
        }
    }
}

impl Classify for FaultKind {
    fn fault_kind(&self) -> FaultKind {
        *self
    }
}
