//! Relay error types.

use crate::config::ConfigError;
use derive_more::{Display, Error, From};

/// What went wrong on a connection.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ProtocolErrorKind {
    /// Socket read or write failed.
    #[display("I/O error: {}", _0)]
    Io(String),
    /// A line was not a message of the expected shape.
    #[display("Malformed message: {}", _0)]
    Malformed(String),
    /// The peer closed before a required message arrived.
    #[display("Connection closed: {}", _0)]
    Closed(String),
}

/// Per-connection failure. Ends the affected handler, never the process.
#[derive(Debug, Clone, Display, Error)]
#[display("Protocol error: {} at {}:{}", kind, file, line)]
pub struct ProtocolError {
    /// Error category and detail.
    pub kind: ProtocolErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProtocolError {
    /// Creates a new protocol error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ProtocolErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a malformed-message error.
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Malformed(message.into()))
    }

    /// Shorthand for an unexpected close.
    #[track_caller]
    pub fn closed(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Closed(message.into()))
    }
}

impl From<std::io::Error> for ProtocolError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(ProtocolErrorKind::Io(err.to_string()))
    }
}

impl From<serde_json::Error> for ProtocolError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

/// Server-level failure: the only errors that stop the relay.
#[derive(Debug, Display, Error, From)]
pub enum RelayError {
    /// The listener could not bind.
    #[display("Failed to bind {}: {}", addr, source)]
    #[from(skip)]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// Querying the bound socket failed.
    #[display("Listener socket error: {}", _0)]
    Socket(std::io::Error),

    /// Configuration was invalid.
    #[display("{}", _0)]
    Config(ConfigError),
}
