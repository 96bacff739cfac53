//! Base58 text encoding for addresses, blockhashes and signatures.
//!
//! The input is treated as one big-endian unsigned integer and rewritten in
//! radix 58 using the Bitcoin alphabet. Each leading zero byte maps to one
//! leading `'1'`, so the encoding is a bijection on byte strings. Address
//! mode carries no checksum; the `*_check` variants append the first four
//! bytes of a double SHA-256 for the legacy checksummed address format.

use sha2::{Digest, Sha256};

use crate::error::Base58Error;

/// The Bitcoin Base58 alphabet (no `0`, `O`, `I`, `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const INVALID: u8 = 0xff;
const CHECKSUM_LEN: usize = 4;

const DECODE_MAP: [u8; 128] = {
    let mut map = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        map[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Encode bytes as a Base58 string.
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // Radix-58 digits, least significant first. log(256)/log(58) ~= 1.37.
    let mut digits: Vec<u8> = Vec::with_capacity((input.len() - zeros) * 138 / 100 + 1);
    for &byte in &input[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat(ALPHABET[0] as char).take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode a Base58 string back into bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, Base58Error> {
    let mut zeros = 0usize;
    let mut leading = true;

    // Base-256 bytes, least significant first. log(58)/log(256) ~= 0.733.
    let mut bytes: Vec<u8> = Vec::with_capacity(input.len() * 733 / 1000 + 1);
    for (index, character) in input.chars().enumerate() {
        let value = digit_value(character)
            .ok_or(Base58Error::InvalidCharacter { character, index })?;

        if leading && value == 0 {
            zeros += 1;
            continue;
        }
        leading = false;

        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

/// Decode a Base58 string that must yield exactly `N` bytes.
pub fn decode_array<const N: usize>(input: &str) -> Result<[u8; N], Base58Error> {
    let bytes = decode(input)?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| Base58Error::InvalidLength {
            expected: N,
            actual: v.len(),
        })
}

/// Encode bytes with a trailing 4-byte double-SHA-256 checksum.
pub fn encode_check(input: &[u8]) -> String {
    let mut payload = Vec::with_capacity(input.len() + CHECKSUM_LEN);
    payload.extend_from_slice(input);
    payload.extend_from_slice(&checksum(input));
    encode(&payload)
}

/// Decode a checksummed Base58 string, verifying and stripping the checksum.
pub fn decode_check(input: &str) -> Result<Vec<u8>, Base58Error> {
    let mut bytes = decode(input)?;
    if bytes.len() < CHECKSUM_LEN {
        return Err(Base58Error::TooShort);
    }

    let split = bytes.len() - CHECKSUM_LEN;
    if checksum(&bytes[..split]) != bytes[split..] {
        return Err(Base58Error::InvalidChecksum);
    }

    bytes.truncate(split);
    Ok(bytes)
}

fn digit_value(character: char) -> Option<u8> {
    if !character.is_ascii() {
        return None;
    }
    match DECODE_MAP[character as usize] {
        INVALID => None,
        value => Some(value),
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(payload));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_encodes_to_empty_string() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn thirty_two_zero_bytes_encode_to_ones() {
        let encoded = encode(&[0u8; 32]);
        assert_eq!(encoded, "1".repeat(32));
        assert_eq!(decode(&encoded).unwrap(), vec![0u8; 32]);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(encode(&[0, 0, 1, 2, 3]), "11Ldp");
        assert_eq!(encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(encode(&[0xff; 4]), "7YXq9G");
    }

    #[test]
    fn leading_zeros_are_reconstructed() {
        assert_eq!(decode("11Ldp").unwrap(), vec![0, 0, 1, 2, 3]);
        assert_eq!(decode("1").unwrap(), vec![0]);
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        for (input, bad, index) in [("0abc", '0', 0), ("abOc", 'O', 2), ("aI", 'I', 1), ("l", 'l', 0)] {
            assert_eq!(
                decode(input),
                Err(Base58Error::InvalidCharacter {
                    character: bad,
                    index,
                })
            );
        }
    }

    #[test]
    fn rejects_non_ascii() {
        assert!(matches!(
            decode("abc\u{00e9}"),
            Err(Base58Error::InvalidCharacter { index: 3, .. })
        ));
    }

    #[test]
    fn decode_array_enforces_length() {
        let key: [u8; 32] = decode_array("11111111111111111111111111111111").unwrap();
        assert_eq!(key, [0u8; 32]);

        assert_eq!(
            decode_array::<32>("11Ldp"),
            Err(Base58Error::InvalidLength {
                expected: 32,
                actual: 5,
            })
        );
    }

    #[test]
    fn token_program_address_decodes_to_known_bytes() {
        let bytes: [u8; 32] = decode_array("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap();
        assert_eq!(
            hex::encode(bytes),
            "06ddf6e1d765a193d9cbe146ceeb79ac1cb485ed5f5b37913a8cf5857eff00a9"
        );
    }

    #[test]
    fn check_variant_roundtrip() {
        let encoded = encode_check(b"legacy address payload");
        assert_eq!(decode_check(&encoded).unwrap(), b"legacy address payload");
    }

    #[test]
    fn check_variant_detects_corruption() {
        let mut bytes = b"payload".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(
            decode_check(&encode(&bytes)),
            Err(Base58Error::InvalidChecksum)
        );
    }

    #[test]
    fn check_variant_rejects_short_input() {
        assert_eq!(decode_check("1"), Err(Base58Error::TooShort));
    }

    #[test]
    fn check_variant_matches_bs58() {
        let payload = [0x00, 0x12, 0x34, 0x56, 0x78];
        assert_eq!(
            encode_check(&payload),
            bs58::encode(payload).with_check().into_string()
        );
    }

    fn bytes_with_leading_zeros() -> impl Strategy<Value = Vec<u8>> {
        (0usize..4, proptest::collection::vec(any::<u8>(), 0..80)).prop_map(|(zeros, tail)| {
            let mut bytes = vec![0u8; zeros];
            bytes.extend(tail);
            bytes
        })
    }

    proptest! {
        #[test]
        fn roundtrip_matches_reference(bytes in bytes_with_leading_zeros()) {
            let encoded = encode(&bytes);
            prop_assert_eq!(&encoded, &bs58::encode(&bytes).into_string());
            prop_assert_eq!(decode(&encoded).unwrap(), bytes);
        }
    }
}
