//! # wallet-core
//!
//! Entry point for hosts: mnemonic handling, hierarchical key derivation and
//! an [`Sdk`] facade that compiles, signs and serializes Solana transactions.
//!
//! The facade holds no global state. Settings come from [`SdkConfig`], logs
//! go to the injected [`LogSink`], and keys and blockhashes come from the
//! [`AccountStorage`] and [`BlockhashProvider`] collaborators.

pub mod config;
pub mod derivation_path;
pub mod error;
pub mod hd_derivation;
pub mod logging;
pub mod mnemonic;
pub mod providers;

use chain_sol::v0::{self, AddressLookupTableAccount};
use chain_sol::{Hash, Instruction, Keypair, Message, Pubkey, Transaction, VersionedMessage};

pub use config::SdkConfig;
pub use derivation_path::{ChildIndex, DerivationPath};
pub use error::{KeyDerivationError, ProviderError, WalletError};
pub use hd_derivation::{DerivationScheme, ExtendedKey};
pub use logging::LogSink;
pub use mnemonic::{generate_mnemonic, is_valid_word, mnemonic_to_seed, validate_mnemonic};
pub use providers::{AccountStorage, BlockhashProvider};

/// Output of [`Sdk::build_and_sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    /// Lamports charged for the signatures at the provider's current rate.
    pub fee: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Sdk {
    config: SdkConfig,
    log: LogSink,
}

impl Sdk {
    pub fn new(config: SdkConfig, log: LogSink) -> Self {
        Self { config, log }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Compile a legacy message. Without `payer` the first signer pays.
    pub fn compile(
        &self,
        payer: Option<&Pubkey>,
        instructions: &[Instruction],
        recent_blockhash: Hash,
    ) -> Result<Message, WalletError> {
        let message = Message::try_compile(payer, instructions, recent_blockhash)?;
        self.log.debug(format_args!(
            "compiled legacy message: {} keys, {} signers, {} instructions",
            message.account_keys.len(),
            message.header.num_required_signatures,
            message.instructions.len(),
        ));
        Ok(message)
    }

    /// Compile a v0 message, moving eligible accounts into `lookup_tables`.
    pub fn compile_v0(
        &self,
        payer: &Pubkey,
        instructions: &[Instruction],
        lookup_tables: &[AddressLookupTableAccount],
        recent_blockhash: Hash,
    ) -> Result<v0::Message, WalletError> {
        let message = v0::Message::try_compile(payer, instructions, lookup_tables, recent_blockhash)?;
        self.log.debug(format_args!(
            "compiled v0 message: {} static keys, {} looked up, {} instructions",
            message.account_keys.len(),
            message.num_lookup_addresses(),
            message.instructions.len(),
        ));
        Ok(message)
    }

    /// Wrap `message` in a transaction and fill the slots of `signers`.
    pub fn sign(
        &self,
        message: impl Into<VersionedMessage>,
        signers: &[&Keypair],
    ) -> Result<Transaction, WalletError> {
        let mut transaction = Transaction::new_unsigned(message)?;
        transaction.try_sign(signers)?;
        self.log.trace(format_args!(
            "signed {} of {} slots",
            transaction.signatures().len() - transaction.missing_signers().len(),
            transaction.signatures().len(),
        ));
        Ok(transaction)
    }

    /// Wire bytes, checked according to the configured signature policy.
    pub fn serialize(&self, transaction: &Transaction) -> Result<Vec<u8>, WalletError> {
        let bytes = transaction.serialize_with_config(&self.config.serialize_config())?;
        self.log.trace(format_args!("serialized transaction: {} bytes", bytes.len()));
        Ok(bytes)
    }

    /// Keypair for `phrase` at the configured path and scheme.
    pub fn derive_keypair(&self, phrase: &str) -> Result<Keypair, WalletError> {
        let seed = mnemonic::mnemonic_to_seed(phrase, &self.config.mnemonic_passphrase)?;
        self.derive_keypair_from_seed(&seed[..])
    }

    pub fn derive_keypair_from_seed(&self, seed: &[u8]) -> Result<Keypair, WalletError> {
        let path = self.config.derivation_path()?;
        let keypair = hd_derivation::derive_keypair(
            seed,
            &path,
            self.config.derivation_scheme,
            self.config.strict_hardened,
        )?;
        self.log.debug(format_args!(
            "derived {} at {path} ({:?})",
            keypair.pubkey(),
            self.config.derivation_scheme,
        ));
        Ok(keypair)
    }

    /// Derive the keypair for `phrase` and hand it to `storage`.
    pub fn restore_account(
        &self,
        storage: &dyn AccountStorage,
        phrase: &str,
    ) -> Result<Pubkey, WalletError> {
        let keypair = self.derive_keypair(phrase)?;
        storage.persist(&keypair)?;
        Ok(keypair.pubkey())
    }

    /// Sign `instructions` with the stored keypair as fee payer against the
    /// provider's latest blockhash.
    pub fn build_and_sign(
        &self,
        storage: &dyn AccountStorage,
        provider: &dyn BlockhashProvider,
        instructions: &[Instruction],
    ) -> Result<SignedTransaction, WalletError> {
        let payer = storage
            .current_keypair()
            .ok_or(ProviderError::MissingKeypair)?;
        let recent_blockhash = provider.recent_blockhash()?;
        let lamports_per_signature = provider.lamports_per_signature()?;

        let payer_key = payer.pubkey();
        let message = self.compile(Some(&payer_key), instructions, recent_blockhash)?;
        let fee = message.fee(lamports_per_signature);
        let transaction = self.sign(message, &[&payer])?;

        self.log.debug(format_args!(
            "built transaction for {payer_key} against {recent_blockhash}, fee {fee}"
        ));
        Ok(SignedTransaction { transaction, fee })
    }
}
