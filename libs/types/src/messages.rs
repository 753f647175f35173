//! OSC message and argument value types
//!
//! The argument universe is a closed set: 32-bit signed integers, 32-bit
//! IEEE-754 floats, UTF-8 strings, and booleans. Representing it as an enum
//! keeps the codec's type dispatch exhaustive and statically checkable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed OSC argument value.
///
/// Booleans are carried entirely in the type-tag string (`T`/`F`) and
/// contribute no argument data bytes on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OscValue {
    /// 32-bit signed integer (`i` tag, big-endian on the wire)
    Int32(i32),
    /// 32-bit IEEE-754 float (`f` tag, big-endian on the wire)
    Float32(f32),
    /// UTF-8 string (`s` tag, null-terminated and 4-byte padded)
    Str(String),
    /// Boolean (`T`/`F` tag, no data bytes)
    Bool(bool),
}

impl OscValue {
    /// Type-tag character for this value.
    pub fn type_tag(&self) -> char {
        match self {
            OscValue::Int32(_) => 'i',
            OscValue::Float32(_) => 'f',
            OscValue::Str(_) => 's',
            OscValue::Bool(true) => 'T',
            OscValue::Bool(false) => 'F',
        }
    }
}

impl fmt::Display for OscValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscValue::Int32(v) => write!(f, "{}", v),
            OscValue::Float32(v) => write!(f, "{}", v),
            OscValue::Str(v) => write!(f, "{:?}", v),
            OscValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for OscValue {
    fn from(v: i32) -> Self {
        OscValue::Int32(v)
    }
}

impl From<f32> for OscValue {
    fn from(v: f32) -> Self {
        OscValue::Float32(v)
    }
}

impl From<&str> for OscValue {
    fn from(v: &str) -> Self {
        OscValue::Str(v.to_string())
    }
}

impl From<String> for OscValue {
    fn from(v: String) -> Self {
        OscValue::Str(v)
    }
}

impl From<bool> for OscValue {
    fn from(v: bool) -> Self {
        OscValue::Bool(v)
    }
}

/// A decoded OSC message.
///
/// The timestamp is assigned by the receiver at capture time and is never
/// carried on the wire. The argument count always equals the number of
/// type-tag characters; a message with a mismatched tag/argument pairing
/// cannot be constructed from the decode path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscMessage {
    /// Address pattern, used here as an exact match key (e.g. `/particles/count`)
    pub address: String,
    /// Ordered argument values, one per type-tag character
    pub args: Vec<OscValue>,
    /// Capture-time instant, receiver-assigned
    pub timestamp: DateTime<Utc>,
}

impl OscMessage {
    /// Create a message stamped with the current time.
    pub fn new(address: impl Into<String>, args: Vec<OscValue>) -> Self {
        Self {
            address: address.into(),
            args,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for OscMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.address)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
