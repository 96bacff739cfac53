use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// Generate a new BIP-39 mnemonic of `word_count` words (12, 15, 18, 21 or 24).
pub fn generate_mnemonic(word_count: usize) -> Result<Zeroizing<String>, WalletError> {
    if !matches!(word_count, 12 | 15 | 18 | 21 | 24) {
        return Err(WalletError::InvalidMnemonic(format!(
            "unsupported word count {word_count}"
        )));
    }

    // 3 words per 32 bits of entropy
    let mut buf = Zeroizing::new([0u8; 32]);
    let entropy = &mut buf[..word_count / 3 * 4];
    rand::rngs::OsRng.fill_bytes(entropy);

    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Whether `phrase` is a valid English mnemonic (words and checksum).
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// 64-byte BIP-39 seed from mnemonic + optional passphrase.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; 64]>, WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

    Ok(Zeroizing::new(mnemonic.to_seed(passphrase)))
}

/// Validate a single word against the BIP-39 word list
pub fn is_valid_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic_word_counts() {
        for count in [12, 15, 18, 21, 24] {
            let mnemonic = generate_mnemonic(count).unwrap();
            assert_eq!(mnemonic.split_whitespace().count(), count);
            assert!(validate_mnemonic(&mnemonic));
        }
    }

    #[test]
    fn test_generate_mnemonic_rejects_odd_counts() {
        assert!(matches!(
            generate_mnemonic(13),
            Err(WalletError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_validate_invalid_mnemonic() {
        assert!(!validate_mnemonic("invalid mnemonic phrase here"));
        // valid words, bad checksum
        assert!(!validate_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
    }

    #[test]
    fn test_bip39_test_vector() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        assert_eq!(
            hex::encode(&seed[..]),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let seed_no_pass = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        let seed_with_pass = mnemonic_to_seed(TEST_MNEMONIC, "mypassphrase").unwrap();
        assert_ne!(seed_no_pass[..], seed_with_pass[..]);
    }

    #[test]
    fn test_invalid_phrase_has_no_seed() {
        assert!(matches!(
            mnemonic_to_seed("not a mnemonic", ""),
            Err(WalletError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_is_valid_word() {
        assert!(is_valid_word("abandon"));
        assert!(is_valid_word("zoo"));
        assert!(!is_valid_word("notaword"));
        assert!(!is_valid_word(""));
    }
}
