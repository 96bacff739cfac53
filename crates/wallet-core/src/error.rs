use chain_sol::{CompileError, KeypairError, PubkeyError, SigningError, SolError};
use thiserror::Error;
use wire_codec::DecodingError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDerivationError {
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("child index {0} is not hardened")]
    IndexInvalid(u32),

    #[error("keyed hash failure: {0}")]
    HashFailure(String),

    #[error("bip32 derivation failed: {0}")]
    Bip32(String),

    #[error("invalid seed length: expected 16..=64 bytes, got {0}")]
    InvalidSeedLength(usize),
}

/// Failures reported by host-supplied collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("no keypair in account storage")]
    MissingKeypair,

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    KeyDerivation(#[from] KeyDerivationError),

    #[error(transparent)]
    Pubkey(#[from] PubkeyError),

    #[error(transparent)]
    Keypair(#[from] KeypairError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("decoding error: {0}")]
    Decoding(#[from] DecodingError),

    #[error(transparent)]
    Sol(#[from] SolError),
}
