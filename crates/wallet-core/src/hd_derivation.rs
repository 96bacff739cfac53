//! Hierarchical key derivation for Ed25519 signing keys.
//!
//! Two schemes are supported:
//!
//! - **SLIP-0010** (default): HMAC-SHA512 tree over the Ed25519 seed.
//!   Only hardened children exist on this curve.
//! - **Legacy BIP-32**: a secp256k1 keychain walked with `bip32`, whose
//!   32-byte private key at the end of the path becomes the Ed25519 seed.
//!   Older wallets derived accounts this way, with mixed hardening such as
//!   `m/501'/0'/0/0`.

use bip32::XPrv;
use chain_sol::Keypair;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::derivation_path::{DerivationPath, HARDENED_OFFSET};
use crate::error::KeyDerivationError;

type HmacSha512 = Hmac<Sha512>;

const MASTER_KEY_DOMAIN: &[u8] = b"ed25519 seed";

pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationScheme {
    #[default]
    Slip10,
    LegacyBip32,
}

/// Private key and chain code at one node of the SLIP-0010 tree.
#[derive(Clone)]
pub struct ExtendedKey {
    private_key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    /// Root of the tree: HMAC-SHA512 keyed with `"ed25519 seed"`.
    pub fn master(seed: &[u8]) -> Result<Self, KeyDerivationError> {
        check_seed_len(seed)?;
        Self::from_hmac(MASTER_KEY_DOMAIN, &[seed])
    }

    /// Hardened child at `index`, which must already carry the hardened bit.
    pub fn derive_child(&self, index: u32) -> Result<Self, KeyDerivationError> {
        if index < HARDENED_OFFSET {
            return Err(KeyDerivationError::IndexInvalid(index));
        }
        Self::from_hmac(
            &self.chain_code[..],
            &[&[0x00][..], &self.private_key[..], &index.to_be_bytes()[..]],
        )
    }

    /// Walk `path` from the master key of `seed`.
    ///
    /// With `strict` set a non-hardened segment fails with
    /// [`KeyDerivationError::IndexInvalid`]; otherwise it is treated as
    /// hardened.
    pub fn derive_path(
        path: &DerivationPath,
        seed: &[u8],
        strict: bool,
    ) -> Result<Self, KeyDerivationError> {
        let mut key = Self::master(seed)?;
        for segment in path.segments() {
            if strict && !segment.hardened {
                return Err(KeyDerivationError::IndexInvalid(segment.index));
            }
            key = key.derive_child(segment.index | HARDENED_OFFSET)?;
        }
        Ok(key)
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn public_key(&self) -> [u8; 32] {
        crypto_utils::derive_public_key(&self.private_key)
    }

    pub fn to_keypair(&self) -> Keypair {
        Keypair::from_seed(&self.private_key)
    }

    fn from_hmac(key: &[u8], parts: &[&[u8]]) -> Result<Self, KeyDerivationError> {
        let mut mac = HmacSha512::new_from_slice(key)
            .map_err(|e| KeyDerivationError::HashFailure(e.to_string()))?;
        for part in parts {
            mac.update(part);
        }
        let mut output = Zeroizing::new([0u8; 64]);
        output.copy_from_slice(&mac.finalize().into_bytes());

        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        private_key.copy_from_slice(&output[..32]);
        chain_code.copy_from_slice(&output[32..]);
        Ok(Self {
            private_key,
            chain_code,
        })
    }
}

impl std::fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExtendedKey(..)")
    }
}

/// Derive the Ed25519 keypair at `path` under `scheme`.
pub fn derive_keypair(
    seed: &[u8],
    path: &DerivationPath,
    scheme: DerivationScheme,
    strict: bool,
) -> Result<Keypair, KeyDerivationError> {
    match scheme {
        DerivationScheme::Slip10 => {
            ExtendedKey::derive_path(path, seed, strict).map(|key| key.to_keypair())
        }
        DerivationScheme::LegacyBip32 => derive_legacy_bip32(seed, path),
    }
}

fn derive_legacy_bip32(seed: &[u8], path: &DerivationPath) -> Result<Keypair, KeyDerivationError> {
    check_seed_len(seed)?;

    let bip32_path: bip32::DerivationPath = path
        .to_string()
        .parse()
        .map_err(|e: bip32::Error| KeyDerivationError::Bip32(e.to_string()))?;

    let xprv = XPrv::derive_from_path(seed, &bip32_path)
        .map_err(|e| KeyDerivationError::Bip32(e.to_string()))?;

    let private_key: Zeroizing<[u8; 32]> = Zeroizing::new(xprv.to_bytes().into());
    Ok(Keypair::from_seed(&private_key))
}

fn check_seed_len(seed: &[u8]) -> Result<(), KeyDerivationError> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(KeyDerivationError::InvalidSeedLength(seed.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::mnemonic_to_seed;

    const MIRACLE_MNEMONIC: &str =
        "miracle pizza supply useful steak border same again youth silver access hundred";

    fn slip10_seed() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn slip10_vector_1_master() {
        let master = ExtendedKey::master(&slip10_seed()).unwrap();
        assert_eq!(
            hex::encode(master.private_key()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
        assert_eq!(
            hex::encode(master.public_key()),
            "a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed"
        );
    }

    #[test]
    fn slip10_vector_1_first_hardened_child() {
        let path: DerivationPath = "m/0'".parse().unwrap();
        let child = ExtendedKey::derive_path(&path, &slip10_seed(), true).unwrap();
        assert_eq!(
            hex::encode(child.private_key()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(child.chain_code()),
            "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69"
        );
        assert_eq!(
            hex::encode(child.public_key()),
            "8c8a13df77a28f3445213a0f432fde644acaa215fc72dcdf300d5efaa85d350c"
        );
    }

    #[test]
    fn non_hardened_child_is_rejected() {
        let master = ExtendedKey::master(&slip10_seed()).unwrap();
        assert_eq!(
            master.derive_child(7).unwrap_err(),
            KeyDerivationError::IndexInvalid(7)
        );
    }

    #[test]
    fn strict_mode_rejects_mixed_paths() {
        let path: DerivationPath = "m/501'/0'/0/0".parse().unwrap();
        assert_eq!(
            ExtendedKey::derive_path(&path, &slip10_seed(), true).unwrap_err(),
            KeyDerivationError::IndexInvalid(0)
        );
    }

    #[test]
    fn permissive_mode_promotes_to_hardened() {
        let mixed: DerivationPath = "m/44'/501'/0/0".parse().unwrap();
        let hardened = DerivationPath::default_solana(0, 0);
        let seed = slip10_seed();
        assert_eq!(
            ExtendedKey::derive_path(&mixed, &seed, false).unwrap().private_key(),
            ExtendedKey::derive_path(&hardened, &seed, true).unwrap().private_key()
        );
    }

    #[test]
    fn seed_length_bounds() {
        assert_eq!(
            ExtendedKey::master(&[0u8; 15]).unwrap_err(),
            KeyDerivationError::InvalidSeedLength(15)
        );
        assert_eq!(
            ExtendedKey::master(&[0u8; 65]).unwrap_err(),
            KeyDerivationError::InvalidSeedLength(65)
        );
        assert!(ExtendedKey::master(&[0u8; 16]).is_ok());
        assert!(ExtendedKey::master(&[0u8; 64]).is_ok());
    }

    #[test]
    fn derivation_deterministic() {
        let seed = mnemonic_to_seed(MIRACLE_MNEMONIC, "").unwrap();
        let path = DerivationPath::default_solana(0, 0);
        let a = derive_keypair(&seed[..], &path, DerivationScheme::Slip10, true).unwrap();
        let b = derive_keypair(&seed[..], &path, DerivationScheme::Slip10, true).unwrap();
        assert_eq!(a.pubkey(), b.pubkey());
        assert_eq!(a.pubkey().to_string(), "HnXJX1Bvps8piQwDYEYC6oea9GEkvQvahvRj3c97X9xr");
    }

    #[test]
    fn different_accounts_different_keys() {
        let seed = mnemonic_to_seed(MIRACLE_MNEMONIC, "").unwrap();
        let account_1 = DerivationPath::default_solana(1, 0);
        let key = derive_keypair(&seed[..], &account_1, DerivationScheme::Slip10, true).unwrap();
        assert_eq!(key.pubkey().to_string(), "BEeBti861gP2hHA8FyRCVyB6s1dz5eDH87fhLnSroW5m");
    }

    #[test]
    fn legacy_bip32_keychain() {
        let seed = mnemonic_to_seed(MIRACLE_MNEMONIC, "").unwrap();
        let path: DerivationPath = "m/501'/0'/0/0".parse().unwrap();
        let key = derive_keypair(&seed[..], &path, DerivationScheme::LegacyBip32, true).unwrap();
        assert_eq!(key.pubkey().to_string(), "3h1zGmCwsRJnVk5BuRNMLsPaQu1y2aqXqXDWYCgrp5UG");
    }

    #[test]
    fn public_key_matches_keypair() {
        let key = ExtendedKey::master(&slip10_seed()).unwrap();
        assert_eq!(key.to_keypair().pubkey().to_bytes(), key.public_key());
    }

    #[test]
    fn scheme_serde_names() {
        assert_eq!(serde_json::to_string(&DerivationScheme::Slip10).unwrap(), "\"slip10\"");
        assert_eq!(
            serde_json::from_str::<DerivationScheme>("\"legacy_bip32\"").unwrap(),
            DerivationScheme::LegacyBip32
        );
    }
}
