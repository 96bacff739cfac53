//! Signed transactions and their wire format.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message                 legacy or versioned message bytes
//! ```
//!
//! Signature slots line up one-to-one with the leading signer keys of the
//! message. A slot stays all-zero until its key signs.

use wire_codec::{DecodingError, Reader, Writer};

use crate::error::SigningError;
use crate::hash::Hash;
use crate::keypair::Keypair;
use crate::message::{read_short_len, write_short_len};
use crate::pubkey::Pubkey;
use crate::signature::{Signature, SIGNATURE_BYTES};
use crate::versioned::VersionedMessage;

/// Where a transaction is in its signing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningState {
    Unsigned,
    PartiallySigned,
    FullySigned,
}

/// Checks applied when producing wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Refuse to emit a transaction with empty signature slots.
    pub require_all_signatures: bool,
    /// Verify every filled slot against the message first.
    pub verify_signatures: bool,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            require_all_signatures: true,
            verify_signatures: true,
        }
    }
}

impl SerializeConfig {
    /// Partial output for dry runs.
    pub fn simulation() -> Self {
        Self {
            require_all_signatures: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    signatures: Vec<Signature>,
    message: VersionedMessage,
}

impl Transaction {
    /// Wrap `message` with one empty slot per required signer.
    ///
    /// A message needs at least a fee payer: no keys or no required
    /// signatures is rejected.
    pub fn new_unsigned(message: impl Into<VersionedMessage>) -> Result<Self, SigningError> {
        let message = message.into();
        if message.static_account_keys().is_empty() {
            return Err(SigningError::InvalidTransaction(
                "message references no accounts".into(),
            ));
        }

        let num_signers = usize::from(message.header().num_required_signatures);
        if num_signers == 0 {
            return Err(SigningError::InvalidTransaction(
                "message requires no signatures".into(),
            ));
        }
        if num_signers > message.static_account_keys().len() {
            return Err(SigningError::InvalidTransaction(format!(
                "{num_signers} signers but only {} account keys",
                message.static_account_keys().len()
            )));
        }

        Ok(Self {
            signatures: vec![Signature::default(); num_signers],
            message,
        })
    }

    pub fn message(&self) -> &VersionedMessage {
        &self.message
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn state(&self) -> SigningState {
        let filled = self.signatures.iter().filter(|s| !s.is_placeholder()).count();
        match filled {
            0 => SigningState::Unsigned,
            n if n == self.signatures.len() => SigningState::FullySigned,
            _ => SigningState::PartiallySigned,
        }
    }

    /// Signature slot of `pubkey`, if it is a required signer.
    pub fn signer_position(&self, pubkey: &Pubkey) -> Option<usize> {
        self.message.signer_keys().iter().position(|key| key == pubkey)
    }

    /// Keys whose slots are still empty.
    pub fn missing_signers(&self) -> Vec<Pubkey> {
        self.message
            .signer_keys()
            .iter()
            .zip(&self.signatures)
            .filter(|(_, signature)| signature.is_placeholder())
            .map(|(key, _)| *key)
            .collect()
    }

    /// The bytes each signer signs.
    pub fn message_data(&self) -> Result<Vec<u8>, SigningError> {
        Ok(self.message.serialize()?)
    }

    /// Swap the blockhash. Only allowed before any slot is filled, since
    /// existing signatures would no longer match.
    pub fn set_recent_blockhash(&mut self, blockhash: Hash) -> Result<(), SigningError> {
        if self.state() != SigningState::Unsigned {
            return Err(SigningError::MessageLocked);
        }
        self.message.set_recent_blockhash(blockhash);
        Ok(())
    }

    pub fn sign(&mut self, keypair: &Keypair) -> Result<(), SigningError> {
        self.try_sign(&[keypair])
    }

    /// Fill the slot of every keypair in `keypairs`.
    ///
    /// All keys are checked before any slot is written, so a failure leaves
    /// the transaction unchanged. A slot that already holds a valid signature
    /// from the same key is left as is.
    pub fn try_sign(&mut self, keypairs: &[&Keypair]) -> Result<(), SigningError> {
        if keypairs.is_empty() {
            return Err(SigningError::EmptySignerList);
        }

        let positions = keypairs
            .iter()
            .map(|keypair| {
                let pubkey = keypair.pubkey();
                self.signer_position(&pubkey)
                    .ok_or(SigningError::KeyNotRequiredAsSigner(pubkey))
            })
            .collect::<Result<Vec<usize>, _>>()?;

        let message_data = self.message_data()?;
        for (keypair, position) in keypairs.iter().zip(positions) {
            let current = &self.signatures[position];
            if !current.is_placeholder() && current.verify(&keypair.pubkey(), &message_data) {
                continue;
            }
            self.signatures[position] = keypair.sign_message(&message_data);
        }
        Ok(())
    }

    /// Check every filled slot. Empty slots are not errors here.
    pub fn verify(&self) -> Result<(), SigningError> {
        let message_data = self.message_data()?;
        for (key, signature) in self.message.signer_keys().iter().zip(&self.signatures) {
            if !signature.is_placeholder() && !signature.verify(key, &message_data) {
                return Err(SigningError::InvalidSignature(*key));
            }
        }
        Ok(())
    }

    pub fn is_fully_signed(&self) -> bool {
        self.state() == SigningState::FullySigned
    }

    /// Fully signed, verified wire bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, SigningError> {
        self.serialize_with_config(&SerializeConfig::default())
    }

    /// Wire bytes with empty slots allowed, for simulation.
    pub fn serialize_for_simulation(&self) -> Result<Vec<u8>, SigningError> {
        self.serialize_with_config(&SerializeConfig::simulation())
    }

    pub fn serialize_with_config(&self, config: &SerializeConfig) -> Result<Vec<u8>, SigningError> {
        if config.require_all_signatures {
            let missing = self.signatures.iter().filter(|s| s.is_placeholder()).count();
            if missing > 0 {
                return Err(SigningError::NotFullySigned { missing });
            }
        }
        if config.verify_signatures {
            self.verify()?;
        }

        let mut writer = Writer::with_capacity(1 + self.signatures.len() * SIGNATURE_BYTES + 256);
        write_short_len(&mut writer, self.signatures.len())?;
        for signature in &self.signatures {
            writer.write_bytes(signature.as_ref());
        }
        self.message.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Parse wire bytes, e.g. a transaction built elsewhere that still needs
    /// our signature.
    ///
    /// The message must pass [`VersionedMessage::sanitize`] and the
    /// signature count must equal its required signatures.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, DecodingError> {
        let mut reader = Reader::new(bytes);

        let num_signatures = read_short_len(&mut reader)?;
        let signatures = (0..num_signatures)
            .map(|_| reader.read_array().map(Signature::new_from_array))
            .collect::<Result<Vec<_>, _>>()?;

        let message = VersionedMessage::decode(&mut reader)?;
        reader.finish()?;

        message.sanitize()?;

        let required = usize::from(message.header().num_required_signatures);
        if signatures.len() != required {
            return Err(DecodingError::InvalidValue(format!(
                "{} signatures for {required} required signers",
                signatures.len()
            )));
        }

        Ok(Self { signatures, message })
    }
}
