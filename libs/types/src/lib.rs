//! # Fogbridge Shared Types
//!
//! ## Purpose
//!
//! Pure data structures shared by the codec and network layers. This crate
//! holds no protocol rules and performs no I/O.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/codec → libs/network
//!     ↑             ↓             ↓
//! Pure Data    Wire Rules     Transport
//! Structures   Encode/Decode  Sockets
//! ```
//!
//! ## What This Crate Contains
//! - `OscMessage`: a decoded message with capture timestamp
//! - `OscValue`: the closed set of argument types the wire format carries
//!
//! ## What This Crate Does NOT Contain
//! - Wire-format encoding/decoding rules (belongs in libs/codec)
//! - Socket management or dispatch logic (belongs in libs/network)

pub mod messages;

// Re-export key types for convenience
pub use messages::{OscMessage, OscValue};
