use chain_sol::SerializeConfig;
use serde::{Deserialize, Serialize};

use crate::derivation_path::DerivationPath;
use crate::error::{KeyDerivationError, WalletError};
use crate::hd_derivation::DerivationScheme;

pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/501'/0'/0'";

/// Host-supplied settings for [`crate::Sdk`].
///
/// Values are checked when used, not when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SdkConfig {
    pub derivation_path: String,
    pub derivation_scheme: DerivationScheme,
    /// Reject non-hardened segments under SLIP-0010 instead of hardening them.
    pub strict_hardened: bool,
    pub require_all_signatures: bool,
    pub verify_signatures: bool,
    pub mnemonic_passphrase: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            derivation_scheme: DerivationScheme::Slip10,
            strict_hardened: true,
            require_all_signatures: true,
            verify_signatures: true,
            mnemonic_passphrase: String::new(),
        }
    }
}

impl SdkConfig {
    pub fn from_json_str(json: &str) -> Result<Self, WalletError> {
        serde_json::from_str(json).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn derivation_path(&self) -> Result<DerivationPath, KeyDerivationError> {
        self.derivation_path.parse()
    }

    pub fn serialize_config(&self) -> SerializeConfig {
        SerializeConfig {
            require_all_signatures: self.require_all_signatures,
            verify_signatures: self.verify_signatures,
        }
    }
}
