use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use wire_codec::{base58, BinaryDecode, BinaryEncode, DecodingError, EncodingError, Reader, Writer};

use crate::error::PubkeyError;

pub const HASH_BYTES: usize = 32;

/// A 32-byte SHA-256 digest. Recent blockhashes use this type.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; HASH_BYTES]);

impl Hash {
    pub const fn new_from_array(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; HASH_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }
}

/// SHA-256 over the concatenation of `parts`.
pub fn hashv(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Hash(hasher.finalize().into())
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_BYTES]> for Hash {
    fn from(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Hash {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base58::decode(s)?;
        <[u8; HASH_BYTES]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| PubkeyError::InvalidLength(bytes.len()))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base58::encode(&self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

impl BinaryEncode for Hash {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        writer.write_bytes(&self.0);
        Ok(())
    }
}

impl BinaryDecode for Hash {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        reader.read_array().map(Self)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashv_matches_single_sha256() {
        let joined = hashv(&[b"hello ", b"world"]);
        let expected: [u8; 32] = Sha256::digest(b"hello world").into();
        assert_eq!(joined.to_bytes(), expected);
    }

    #[test]
    fn base58_roundtrip() {
        let hash = Hash::new_from_array([0xcc; 32]);
        let text = hash.to_string();
        assert_eq!(text.parse::<Hash>().unwrap(), hash);
    }

    #[test]
    fn parse_rejects_short_input() {
        assert_eq!("2".parse::<Hash>(), Err(PubkeyError::InvalidLength(1)));
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Hash::default().to_bytes(), [0u8; 32]);
    }
}
