//! OSC message parsing
//!
//! Walks the three wire sections (address, type tag, argument data) with
//! bounds checking at every step. Arbitrary garbage on the wire yields a
//! typed [`DecodeError`], never a panic: the caller is a long-lived receive
//! loop that must survive anything a UDP socket hands it.

use crate::constants::{align_up, ADDRESS_PREFIX, TYPE_TAG_PREFIX};
use crate::error::{DecodeError, DecodeResult};
use types::{OscMessage, OscValue};

/// Decode one datagram into a message.
///
/// The returned message is stamped with the current time; timestamps are
/// never carried on the wire. An unknown tag character fails the whole
/// message rather than skipping the one argument.
pub fn decode(data: &[u8]) -> DecodeResult<OscMessage> {
    let (address, after_address) = parse_address(data)?;
    let (tags, after_tags) = parse_type_tags(data, after_address)?;
    let args = parse_arguments(data, after_tags, &tags)?;
    Ok(OscMessage::new(address, args))
}

/// Parse the address section, returning the address and the 4-aligned
/// offset of the type-tag section.
fn parse_address(data: &[u8]) -> DecodeResult<(String, usize)> {
    let nul = find_nul(data, 0)
        .ok_or_else(|| DecodeError::malformed_address("missing null terminator", data.len()))?;

    let address = std::str::from_utf8(&data[..nul])
        .map_err(|_| DecodeError::malformed_address("not valid UTF-8", data.len()))?;

    if !address.starts_with(ADDRESS_PREFIX) {
        return Err(DecodeError::malformed_address(
            "must begin with '/'",
            data.len(),
        ));
    }

    Ok((address.to_string(), align_up(nul + 1)))
}

/// Parse the type-tag section at `offset`, returning the tag characters
/// (comma stripped) and the 4-aligned offset of the argument data.
fn parse_type_tags(data: &[u8], offset: usize) -> DecodeResult<(Vec<char>, usize)> {
    let nul = find_nul(data, offset).ok_or_else(|| {
        DecodeError::malformed_type_tag(offset, "missing null terminator", data.len())
    })?;

    let tags = std::str::from_utf8(&data[offset..nul])
        .map_err(|_| DecodeError::malformed_type_tag(offset, "not valid UTF-8", data.len()))?;

    if !tags.starts_with(TYPE_TAG_PREFIX) {
        return Err(DecodeError::malformed_type_tag(
            offset,
            "must begin with ','",
            data.len(),
        ));
    }

    Ok((tags.chars().skip(1).collect(), align_up(nul + 1)))
}

/// Consume one argument per tag character, advancing the read cursor.
fn parse_arguments(data: &[u8], mut offset: usize, tags: &[char]) -> DecodeResult<Vec<OscValue>> {
    let mut args = Vec::with_capacity(tags.len());

    for (position, &tag) in tags.iter().enumerate() {
        match tag {
            'i' => {
                let raw = take_word(data, offset, tag)?;
                args.push(OscValue::Int32(i32::from_be_bytes(raw)));
                offset += 4;
            }
            'f' => {
                let raw = take_word(data, offset, tag)?;
                args.push(OscValue::Float32(f32::from_be_bytes(raw)));
                offset += 4;
            }
            's' => {
                let nul = find_nul(data, offset).ok_or_else(|| {
                    DecodeError::truncated('s', offset, 1, data.len().saturating_sub(offset))
                })?;
                let value = std::str::from_utf8(&data[offset..nul])
                    .map_err(|_| DecodeError::InvalidString { offset })?;
                args.push(OscValue::Str(value.to_string()));
                offset = align_up(nul + 1);
            }
            'T' => args.push(OscValue::Bool(true)),
            'F' => args.push(OscValue::Bool(false)),
            other => {
                return Err(DecodeError::UnknownTypeTag {
                    tag: other,
                    position,
                })
            }
        }
    }

    Ok(args)
}

/// Read a 4-byte big-endian word at `offset`.
fn take_word(data: &[u8], offset: usize, tag: char) -> DecodeResult<[u8; 4]> {
    let end = offset + 4;
    if end > data.len() {
        return Err(DecodeError::truncated(
            tag,
            offset,
            4,
            data.len().saturating_sub(offset),
        ));
    }
    let mut word = [0u8; 4];
    word.copy_from_slice(&data[offset..end]);
    Ok(word)
}

/// Position of the first null byte at or after `start`, if any.
fn find_nul(data: &[u8], start: usize) -> Option<usize> {
    if start >= data.len() {
        return None;
    }
    data[start..].iter().position(|&b| b == 0).map(|p| start + p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_int_message() {
        let mut data = b"/particles/count\0\0\0\0".to_vec();
        data.extend_from_slice(b",i\0\0");
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x2A]);

        let msg = decode(&data).unwrap();
        assert_eq!(msg.address, "/particles/count");
        assert_eq!(msg.args, vec![OscValue::Int32(42)]);
    }

    #[test]
    fn decodes_mixed_arguments() {
        let mut data = b"/mix\0\0\0\0".to_vec();
        data.extend_from_slice(b",ifsTF\0\0");
        data.extend_from_slice(&7_i32.to_be_bytes());
        data.extend_from_slice(&1.5_f32.to_be_bytes());
        data.extend_from_slice(b"fog\0");

        let msg = decode(&data).unwrap();
        assert_eq!(
            msg.args,
            vec![
                OscValue::Int32(7),
                OscValue::Float32(1.5),
                OscValue::Str("fog".to_string()),
                OscValue::Bool(true),
                OscValue::Bool(false),
            ]
        );
    }

    #[test]
    fn missing_address_terminator_fails() {
        let err = decode(b"/no-terminator").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedAddress { .. }));
    }

    #[test]
    fn address_without_slash_fails() {
        let err = decode(b"oops\0\0\0\0,\0\0\0").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedAddress { .. }));
    }

    #[test]
    fn missing_type_tag_fails() {
        // Address only, buffer ends before any tag section.
        let err = decode(b"/a\0\0").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTypeTag { .. }));
    }

    #[test]
    fn tag_without_comma_fails() {
        let err = decode(b"/a\0\0i\0\0\0").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTypeTag { .. }));
    }

    #[test]
    fn truncated_int_argument_fails() {
        let mut data = b"/a\0\0".to_vec();
        data.extend_from_slice(b",i\0\0");
        data.extend_from_slice(&[0x00, 0x01]); // only 2 of 4 bytes

        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedArguments { tag: 'i', .. }
        ));
    }

    #[test]
    fn unknown_tag_fails_whole_message() {
        let mut data = b"/a\0\0".to_vec();
        data.extend_from_slice(b",ib\0");
        data.extend_from_slice(&1_i32.to_be_bytes());

        let err = decode(&data).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownTypeTag {
                tag: 'b',
                position: 1
            }
        );
    }

    #[test]
    fn unterminated_string_argument_fails() {
        let mut data = b"/a\0\0".to_vec();
        data.extend_from_slice(b",s\0\0");
        data.extend_from_slice(b"fog"); // no terminator

        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedArguments { tag: 's', .. }
        ));
    }

    #[test]
    fn empty_buffer_fails() {
        assert!(matches!(
            decode(&[]),
            Err(DecodeError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn booleans_decode_from_tags_alone() {
        let mut data = b"/kinect/enable\0\0".to_vec();
        data.extend_from_slice(b",T\0\0");

        let msg = decode(&data).unwrap();
        assert_eq!(msg.args, vec![OscValue::Bool(true)]);
    }
}
