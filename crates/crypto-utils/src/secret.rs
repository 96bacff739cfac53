//! Ed25519 secret seed storage.

use std::fmt;

use rand::RngCore;
use rand_core::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::edwards::derive_public_key;

pub const SEED_LENGTH: usize = 32;

/// A 32-byte Ed25519 secret seed, wiped when dropped.
///
/// `Debug` never prints the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretSeed([u8; SEED_LENGTH]);

impl SecretSeed {
    pub fn from_bytes(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SEED_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }

    /// The public key belonging to this seed.
    pub fn public_key(&self) -> [u8; 32] {
        derive_public_key(&self.0)
    }
}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretSeed(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_seeds_differ() {
        let a = SecretSeed::generate();
        let b = SecretSeed::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
        assert!(a.as_bytes().iter().any(|&byte| byte != 0));
    }

    #[test]
    fn debug_hides_bytes() {
        let seed = SecretSeed::from_bytes([0xab; SEED_LENGTH]);
        let rendered = format!("{seed:?}");
        assert_eq!(rendered, "SecretSeed(..)");
        assert!(!rendered.contains("171"));
    }

    #[test]
    fn public_key_matches_free_function() {
        let seed = SecretSeed::from_bytes([7; SEED_LENGTH]);
        assert_eq!(seed.public_key(), derive_public_key(&[7; SEED_LENGTH]));
    }

    #[test]
    fn zeroize_clears_bytes() {
        let mut seed = SecretSeed::from_bytes([0x5a; SEED_LENGTH]);
        seed.zeroize();
        assert_eq!(seed.as_bytes(), &[0u8; SEED_LENGTH]);
    }
}
