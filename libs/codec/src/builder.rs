//! OSC message construction
//!
//! Builds the exact byte sequence for an address/argument pair:
//! `<padded address><padded type-tag string><argument data>`. Output is
//! deterministic for a given input.

use crate::constants::{ADDRESS_PREFIX, ALIGNMENT, TYPE_TAG_PREFIX};
use crate::error::{EncodeError, EncodeResult};
use types::OscValue;

/// Encode an address and argument list into wire bytes.
///
/// The address must be non-empty and begin with `/`. Numeric arguments are
/// written big-endian (network byte order); booleans are carried entirely in
/// the type tag and emit no data bytes.
pub fn encode(address: &str, args: &[OscValue]) -> EncodeResult<Vec<u8>> {
    validate_address(address)?;

    // Worst case: every arg is a 4-byte numeric plus padded tag/address.
    let mut buf = Vec::with_capacity(align_len(address.len()) + align_len(args.len() + 1) + args.len() * 4);

    push_padded_str(&mut buf, address);

    let mut tags = String::with_capacity(args.len() + 1);
    tags.push(TYPE_TAG_PREFIX);
    for arg in args {
        tags.push(arg.type_tag());
    }
    push_padded_str(&mut buf, &tags);

    for arg in args {
        match arg {
            OscValue::Int32(v) => buf.extend_from_slice(&v.to_be_bytes()),
            OscValue::Float32(v) => buf.extend_from_slice(&v.to_be_bytes()),
            OscValue::Str(s) => push_padded_str(&mut buf, s),
            // T/F carry no argument data
            OscValue::Bool(_) => {}
        }
    }

    Ok(buf)
}

fn validate_address(address: &str) -> EncodeResult<()> {
    if address.is_empty() {
        return Err(EncodeError::InvalidAddress {
            address: address.to_string(),
            reason: "address must not be empty",
        });
    }
    if !address.starts_with(ADDRESS_PREFIX) {
        return Err(EncodeError::InvalidAddress {
            address: address.to_string(),
            reason: "address must begin with '/'",
        });
    }
    Ok(())
}

/// Padded on-wire length of a string field of `len` bytes: at least one
/// null terminator, then zero-fill to a 4-byte multiple.
fn align_len(len: usize) -> usize {
    (len + 1).div_ceil(ALIGNMENT) * ALIGNMENT
}

fn push_padded_str(buf: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    buf.extend_from_slice(bytes);
    let padded = align_len(bytes.len());
    buf.resize(buf.len() + (padded - bytes.len()), 0);
}
