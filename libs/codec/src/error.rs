//! Typed encode/decode failures for the OSC wire format
//!
//! Decode never panics on arbitrary wire bytes: every malformed input maps
//! to a [`DecodeError`] value so the long-lived receive loop can drop the
//! datagram and keep running. Each variant carries enough buffer context to
//! diagnose the offending datagram from logs alone.

use thiserror::Error;

/// Errors raised while building wire bytes from caller input.
///
/// The argument universe is closed by the `OscValue` enum, so the only
/// remaining encode precondition is the address shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Address is empty or does not begin with `/`
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress {
        address: String,
        reason: &'static str,
    },
}

/// Errors raised while parsing wire bytes into a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Address field is unterminated, non-UTF-8, or missing the leading `/`
    #[error("malformed address: {reason} (buffer: {buffer_size} bytes)")]
    MalformedAddress {
        reason: &'static str,
        buffer_size: usize,
    },

    /// Type-tag field is unterminated, non-UTF-8, or missing the leading `,`
    #[error("malformed type tag at offset {offset}: {reason} (buffer: {buffer_size} bytes)")]
    MalformedTypeTag {
        offset: usize,
        reason: &'static str,
        buffer_size: usize,
    },

    /// Buffer exhausted before every tag character was consumed
    #[error("truncated arguments: tag '{tag}' at offset {offset} needs {need} bytes, {got} available")]
    TruncatedArguments {
        tag: char,
        offset: usize,
        need: usize,
        got: usize,
    },

    /// Tag character outside the supported set `i f s T F`
    #[error("unknown type tag character {tag:?} at argument position {position}")]
    UnknownTypeTag { tag: char, position: usize },

    /// String argument bytes are not valid UTF-8
    #[error("invalid string argument at offset {offset}: not valid UTF-8")]
    InvalidString { offset: usize },
}

impl DecodeError {
    /// Create a MalformedAddress error with buffer context
    pub fn malformed_address(reason: &'static str, buffer_size: usize) -> Self {
        Self::MalformedAddress {
            reason,
            buffer_size,
        }
    }

    /// Create a MalformedTypeTag error with buffer context
    pub fn malformed_type_tag(offset: usize, reason: &'static str, buffer_size: usize) -> Self {
        Self::MalformedTypeTag {
            offset,
            reason,
            buffer_size,
        }
    }

    /// Create a TruncatedArguments error for a tag needing `need` bytes
    pub fn truncated(tag: char, offset: usize, need: usize, got: usize) -> Self {
        Self::TruncatedArguments {
            tag,
            offset,
            need,
            got,
        }
    }
}

/// Result type alias for encode operations
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type alias for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;
