use std::fmt;
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;
use wire_codec::base58;

use crate::error::PubkeyError;
use crate::pubkey::Pubkey;

pub const SIGNATURE_BYTES: usize = 64;

/// A detached 64-byte Ed25519 signature.
///
/// The all-zero value is the placeholder for a slot that has not been signed
/// yet.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; SIGNATURE_BYTES])
    }
}

impl Signature {
    pub const fn new_from_array(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; SIGNATURE_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Strict Ed25519 verification of `message` under `pubkey`.
    pub fn verify(&self, pubkey: &Pubkey, message: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(pubkey.as_array()) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&self.0);
        key.verify_strict(message, &signature).is_ok()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_BYTES]> for Signature {
    fn from(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<ed25519_dalek::Signature> for Signature {
    fn from(signature: ed25519_dalek::Signature) -> Self {
        Self(signature.to_bytes())
    }
}

impl FromStr for Signature {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base58::decode(s)?;
        <[u8; SIGNATURE_BYTES]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| PubkeyError::InvalidLength(bytes.len()))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base58::encode(&self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}
