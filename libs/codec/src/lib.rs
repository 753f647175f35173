//! # Fogbridge OSC Codec
//!
//! ## Purpose
//!
//! Pure encode/decode between an [`OscMessage`](types::OscMessage) value and
//! its wire bytes. This crate contains the "rules" layer: the bit-exact
//! binary contract and nothing else. No sockets, no state, no logging.
//!
//! ## Wire Format
//!
//! One message per UDP datagram, no framing beyond the datagram boundary:
//!
//! ```text
//! <padded address> <padded type-tag string> <argument data>
//! ```
//!
//! - Address: UTF-8 bytes, at least one `0x00` terminator, zero-padded to a
//!   multiple of 4 bytes. Must be non-empty and begin with `/`.
//! - Type tag: starts with `,`; one character per argument (`i`, `f`, `s`,
//!   `T`, `F`); terminated and padded like the address.
//! - Argument data, in tag order: `i`/`f` are 4 bytes big-endian; `s` is
//!   UTF-8 plus terminator plus padding; `T`/`F` emit no bytes.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → libs/network
//!     ↑           ↓           ↓
//! Pure Data   Wire Rules   Transport
//! Structures  Validation   Sockets
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Network transport logic (belongs in libs/network)
//! - Raw data structure definitions (belongs in libs/types)

pub mod builder;
pub mod constants;
pub mod error;
pub mod parser;

// Re-export key functions and types for convenience
pub use builder::encode;
pub use constants::{ALIGNMENT, MAX_DATAGRAM_SIZE};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use parser::decode;
