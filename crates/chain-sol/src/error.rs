use thiserror::Error;
use wire_codec::{Base58Error, DecodingError, EncodingError};

use crate::pubkey::Pubkey;

/// Failure to build a [`Pubkey`] from text or bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PubkeyError {
    #[error("invalid base58: {0}")]
    InvalidBase58(#[from] Base58Error),

    #[error("invalid public key length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeypairError {
    #[error("invalid keypair length: expected 64 bytes, got {0}")]
    InvalidLength(usize),

    #[error("public key does not match secret seed")]
    PublicKeyMismatch,

    #[error("invalid base58: {0}")]
    InvalidBase58(#[from] Base58Error),
}

/// Errors raised while turning instructions into a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("no fee payer: none given and no instruction account is a signer")]
    MissingFeePayer,

    #[error("too many account keys: {0} exceeds the limit of 256")]
    TooManyAccountKeys(usize),

    #[error("too many signers: {0} exceeds the limit of 255")]
    TooManySigners(usize),

    #[error("account {0} is not in the compiled key table")]
    UnknownAccount(Pubkey),

    #[error("lookup table {0} has an address beyond index 255")]
    LookupTableIndexOverflow(Pubkey),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("key {0} is not a required signer")]
    KeyNotRequiredAsSigner(Pubkey),

    #[error("transaction not fully signed: {missing} signature(s) missing")]
    NotFullySigned { missing: usize },

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("no signers given")]
    EmptySignerList,

    #[error("signature for {0} does not verify")]
    InvalidSignature(Pubkey),

    #[error("message is locked once a signature is attached")]
    MessageLocked,

    #[error("message encoding failed: {0}")]
    Encoding(#[from] EncodingError),
}

/// Program-derived address errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PdaError {
    #[error("too many seeds: {0} exceeds the limit of 16")]
    MaxSeedsExceeded(usize),

    #[error("seed of {0} bytes exceeds the limit of 32")]
    MaxSeedLengthExceeded(usize),

    #[error("derived address lies on the ed25519 curve")]
    InvalidSeeds,

    #[error("no bump seed yields an off-curve address")]
    NoViableBump,
}

/// Umbrella error for callers that do not care which stage failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    #[error(transparent)]
    Pubkey(#[from] PubkeyError),

    #[error(transparent)]
    Keypair(#[from] KeypairError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Pda(#[from] PdaError),

    #[error("decoding error: {0}")]
    Decoding(#[from] DecodingError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}
