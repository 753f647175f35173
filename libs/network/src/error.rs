//! Transport Error Types
//!
//! Failure values for socket setup, the receive loop, sending, and
//! shutdown. Decode failures live in the codec crate; callback failures are
//! logged at the dispatch site and never propagate here.

use std::net::SocketAddr;
use thiserror::Error;

/// Main transport error type
#[derive(Error, Debug)]
pub enum TransportError {
    /// Socket could not be bound (port in use, permission denied)
    #[error("bind error on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Transient or fatal socket I/O failure
    #[error("I/O error: {message}")]
    Io {
        message: String,
        source: std::io::Error,
    },

    /// Invalid configuration or send target
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A bounded operation did not finish in time
    #[error("timeout: {operation} exceeded {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Caller input could not be encoded; surfaced before any I/O
    #[error("encode error: {0}")]
    Encode(#[from] codec::EncodeError),

    /// Operation requires a bound transport
    #[error("transport is not bound; call setup first")]
    NotBound,
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }
}
