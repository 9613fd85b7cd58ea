// src/error.rs
use std::fmt;
use std::io;

/// Failure of a single-target query. Never fatal to a scrape cycle.
#[derive(Debug)]
pub enum QueryError {
    Resolve { address: String },
    Io { address: String, source: io::Error },
    Timeout { address: String },
    NoAttempts { address: String },
    BadHeader { address: String },
    Malformed { address: String, reason: String },
}

impl QueryError {
    /// True for resolve/socket/timeout failures, false when the target
    /// answered with something unusable.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Resolve { .. } | Self::Io { .. } | Self::Timeout { .. } | Self::NoAttempts { .. }
        )
    }

    pub fn address(&self) -> &str {
        match self {
            Self::Resolve { address }
            | Self::Io { address, .. }
            | Self::Timeout { address }
            | Self::NoAttempts { address }
            | Self::BadHeader { address }
            | Self::Malformed { address, .. } => address,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve { address } => write!(f, "{}: No IPv4 address found", address),
            Self::Io { address, source } => write!(f, "{}: {}", address, source),
            Self::Timeout { address } => write!(f, "{}: Timed out", address),
            Self::NoAttempts { address } => write!(f, "{}: No query attempts configured", address),
            Self::BadHeader { address } => write!(f, "{}: Response error", address),
            Self::Malformed { address, reason } => write!(f, "{}: Malformed response: {}", address, reason),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
