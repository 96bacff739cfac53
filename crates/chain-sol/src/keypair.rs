//! Ed25519 signing keys.
//!
//! The secret is the 32-byte seed; its 64-byte export is `seed || pubkey`,
//! the layout wallets use for keypair files and Base58 secret strings.

use std::fmt;

use crypto_utils::SecretSeed;
use ed25519_dalek::{Signer, SigningKey};
use wire_codec::base58;
use zeroize::Zeroizing;

use crate::error::KeypairError;
use crate::pubkey::Pubkey;
use crate::signature::Signature;

pub const KEYPAIR_BYTES: usize = 64;

#[derive(Clone)]
pub struct Keypair {
    seed: SecretSeed,
    pubkey: Pubkey,
}

impl Keypair {
    /// Fresh keypair from OS randomness.
    pub fn generate() -> Self {
        Self::from_secret_seed(SecretSeed::generate())
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_secret_seed(SecretSeed::from_bytes(*seed))
    }

    fn from_secret_seed(seed: SecretSeed) -> Self {
        let pubkey = Pubkey::new_from_array(seed.public_key());
        Self { seed, pubkey }
    }

    /// Parse the 64-byte `seed || pubkey` export.
    ///
    /// The public half must be the key derived from the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        if bytes.len() != KEYPAIR_BYTES {
            return Err(KeypairError::InvalidLength(bytes.len()));
        }

        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_seed(&seed);

        if keypair.pubkey.as_ref() != &bytes[32..] {
            return Err(KeypairError::PublicKeyMismatch);
        }
        Ok(keypair)
    }

    pub fn from_base58_string(s: &str) -> Result<Self, KeypairError> {
        let bytes = Zeroizing::new(base58::decode(s)?);
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; KEYPAIR_BYTES]> {
        let mut out = Zeroizing::new([0u8; KEYPAIR_BYTES]);
        out[..32].copy_from_slice(self.seed.as_bytes());
        out[32..].copy_from_slice(self.pubkey.as_ref());
        out
    }

    pub fn to_base58_string(&self) -> Zeroizing<String> {
        Zeroizing::new(base58::encode(&self.to_bytes()[..]))
    }

    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    pub fn secret_seed(&self) -> &[u8; 32] {
        self.seed.as_bytes()
    }

    /// Deterministic Ed25519 signature over `message`.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        let signing_key = SigningKey::from_bytes(self.seed.as_bytes());
        signing_key.sign(message).into()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}
