//! Compact-length encoding used for every sequence count in the wire format.
//!
//! Each byte carries 7 payload bits, least-significant group first, with the
//! high bit set when another byte follows:
//!
//! ```text
//!   0      -> 00
//!   127    -> 7f
//!   128    -> 80 01
//!   16383  -> ff 7f
//!   16384  -> 80 80 01
//! ```

use crate::error::DecodingError;

/// Longest encoding of a `u32` value.
pub const MAX_ENCODING_LENGTH: usize = 5;

/// Encode `value` in compact-length form.
pub fn encode_compact_len(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_ENCODING_LENGTH);
    write_compact_len(&mut out, value);
    out
}

/// Append the compact-length encoding of `value` to `out`.
pub fn write_compact_len(out: &mut Vec<u8>, value: u32) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if rem == 0 {
            break;
        }
    }
}

/// Decode a compact-length value from the front of `data`.
///
/// Returns `(value, bytes_consumed)`. Encodings that end in a redundant zero
/// group are rejected so every value has exactly one representation.
pub fn decode_compact_len(data: &[u8]) -> Result<(u32, usize), DecodingError> {
    let mut value: u64 = 0;

    for (i, &byte) in data.iter().take(MAX_ENCODING_LENGTH).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);

        if byte & 0x80 == 0 {
            if byte == 0 && i > 0 {
                return Err(DecodingError::NonCanonicalLength);
            }
            let value = u32::try_from(value).map_err(|_| DecodingError::LengthOverflow)?;
            return Ok((value, i + 1));
        }
    }

    if data.len() < MAX_ENCODING_LENGTH {
        Err(DecodingError::UnexpectedEndOfData {
            needed: 1,
            remaining: 0,
        })
    } else {
        Err(DecodingError::LengthOverflow)
    }
}

/// Number of bytes `value` occupies once encoded.
pub fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0x0fff_ffff => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VECTORS: &[(u32, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (5, &[0x05]),
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (255, &[0xff, 0x01]),
        (256, &[0x80, 0x02]),
        (32767, &[0xff, 0xff, 0x01]),
        (2_097_152, &[0x80, 0x80, 0x80, 0x01]),
    ];

    #[test]
    fn encodes_reference_vectors() {
        for (value, expected) in VECTORS {
            assert_eq!(encode_compact_len(*value), *expected, "value {value}");
        }
    }

    #[test]
    fn decodes_reference_vectors() {
        for (value, bytes) in VECTORS {
            assert_eq!(decode_compact_len(bytes).unwrap(), (*value, bytes.len()));
        }
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        assert_eq!(decode_compact_len(&[0x80, 0x01, 0xaa, 0xbb]).unwrap(), (128, 2));
    }

    #[test]
    fn decode_empty_input_fails() {
        assert!(matches!(
            decode_compact_len(&[]),
            Err(DecodingError::UnexpectedEndOfData { .. })
        ));
    }

    #[test]
    fn decode_truncated_continuation_fails() {
        assert!(matches!(
            decode_compact_len(&[0x80, 0x80]),
            Err(DecodingError::UnexpectedEndOfData { .. })
        ));
    }

    #[test]
    fn decode_rejects_alias_encodings() {
        assert_eq!(
            decode_compact_len(&[0x80, 0x00]),
            Err(DecodingError::NonCanonicalLength)
        );
        assert_eq!(
            decode_compact_len(&[0xff, 0x80, 0x00]),
            Err(DecodingError::NonCanonicalLength)
        );
    }

    #[test]
    fn decode_rejects_values_above_u32() {
        assert_eq!(
            decode_compact_len(&[0xff, 0xff, 0xff, 0xff, 0x7f]),
            Err(DecodingError::LengthOverflow)
        );
        assert_eq!(
            decode_compact_len(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]),
            Err(DecodingError::LengthOverflow)
        );
    }

    #[test]
    fn u32_max_roundtrips() {
        let encoded = encode_compact_len(u32::MAX);
        assert_eq!(encoded, vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
        assert_eq!(decode_compact_len(&encoded).unwrap(), (u32::MAX, 5));
    }

    proptest! {
        #[test]
        fn roundtrip_and_length(value in any::<u32>()) {
            let encoded = encode_compact_len(value);
            prop_assert_eq!(encoded.len(), encoded_len(value));
            prop_assert_eq!(decode_compact_len(&encoded).unwrap(), (value, encoded.len()));
        }
    }
}
