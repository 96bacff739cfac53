//! Account addresses.
//!
//! An address is the raw 32-byte Ed25519 public key. There is no hashing step
//! and no checksum; the text form is plain Base58 of the bytes.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use wire_codec::{base58, BinaryDecode, BinaryEncode, DecodingError, EncodingError, Reader, Writer};

use crate::error::PubkeyError;

pub const PUBKEY_BYTES: usize = 32;

/// Longest Base58 rendering of 32 bytes.
const MAX_BASE58_LEN: usize = 44;

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Whether the bytes decode to an Ed25519 curve point.
    ///
    /// Wallet addresses are on the curve; program-derived addresses never are.
    pub fn is_on_curve(&self) -> bool {
        crypto_utils::is_on_curve(&self.0)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Pubkey {
    type Error = PubkeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; PUBKEY_BYTES]>::try_from(bytes)
            .map(Self)
            .map_err(|_| PubkeyError::InvalidLength(bytes.len()))
    }
}

impl FromStr for Pubkey {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_BASE58_LEN {
            return Err(PubkeyError::InvalidLength(s.len()));
        }
        let bytes = base58::decode(s)?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base58::encode(&self.0))
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl BinaryEncode for Pubkey {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        writer.write_bytes(&self.0);
        Ok(())
    }
}

impl BinaryDecode for Pubkey {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        reader.read_array().map(Self)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
