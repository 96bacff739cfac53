use std::collections::BTreeSet;

use wire_codec::{DecodingError, EncodingError, Reader, Writer};

use crate::compiled_keys::MAX_ACCOUNT_KEYS;
use crate::hash::Hash;
use crate::instruction::CompiledInstruction;
use crate::message::{is_writable_index, Message, MessageHeader};
use crate::pubkey::Pubkey;
use crate::v0::{self, MESSAGE_VERSION_PREFIX};

/// Either message format, as carried inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedMessage {
    Legacy(Message),
    V0(v0::Message),
}

impl VersionedMessage {
    pub fn header(&self) -> &MessageHeader {
        match self {
            Self::Legacy(message) => &message.header,
            Self::V0(message) => &message.header,
        }
    }

    pub fn static_account_keys(&self) -> &[Pubkey] {
        match self {
            Self::Legacy(message) => &message.account_keys,
            Self::V0(message) => &message.account_keys,
        }
    }

    pub fn instructions(&self) -> &[CompiledInstruction] {
        match self {
            Self::Legacy(message) => &message.instructions,
            Self::V0(message) => &message.instructions,
        }
    }

    pub fn recent_blockhash(&self) -> &Hash {
        match self {
            Self::Legacy(message) => &message.recent_blockhash,
            Self::V0(message) => &message.recent_blockhash,
        }
    }

    pub fn set_recent_blockhash(&mut self, blockhash: Hash) {
        match self {
            Self::Legacy(message) => message.recent_blockhash = blockhash,
            Self::V0(message) => message.recent_blockhash = blockhash,
        }
    }

    /// Keys that must sign, in signature slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let keys = self.static_account_keys();
        let end = usize::from(self.header().num_required_signatures).min(keys.len());
        &keys[..end]
    }

    pub fn is_static_writable(&self, index: usize) -> bool {
        is_writable_index(self.header(), self.static_account_keys().len(), index)
    }

    /// Structural checks for a message decoded from untrusted bytes.
    ///
    /// Header counts must fit the static keys with a writable fee payer,
    /// every index must resolve, and no static key may repeat.
    pub fn sanitize(&self) -> Result<(), DecodingError> {
        let invalid = |reason: String| DecodingError::InvalidValue(reason);
        let header = self.header();
        let keys = self.static_account_keys();
        let required = usize::from(header.num_required_signatures);
        let readonly_signed = usize::from(header.num_readonly_signed_accounts);
        let readonly_unsigned = usize::from(header.num_readonly_unsigned_accounts);

        if required == 0 || required > keys.len() {
            return Err(invalid(format!(
                "{required} required signers for {} account keys",
                keys.len()
            )));
        }
        if readonly_signed >= required {
            return Err(invalid(format!(
                "{readonly_signed} readonly signers leave no writable fee payer among {required}"
            )));
        }
        if readonly_unsigned > keys.len() - required {
            return Err(invalid(format!(
                "{readonly_unsigned} readonly unsigned accounts for {} unsigned keys",
                keys.len() - required
            )));
        }

        let loaded = match self {
            Self::Legacy(_) => 0,
            Self::V0(message) => {
                if let Some(lookup) = message
                    .address_table_lookups
                    .iter()
                    .find(|l| l.writable_indexes.is_empty() && l.readonly_indexes.is_empty())
                {
                    return Err(invalid(format!(
                        "lookup table {} loads no addresses",
                        lookup.account_key
                    )));
                }
                message.num_lookup_addresses()
            }
        };
        let total = keys.len() + loaded;
        if total > MAX_ACCOUNT_KEYS {
            return Err(invalid(format!("{total} accounts exceed {MAX_ACCOUNT_KEYS}")));
        }

        for ix in self.instructions() {
            // Programs are static keys and never the fee payer.
            let program = usize::from(ix.program_id_index);
            if program == 0 || program >= keys.len() {
                return Err(invalid(format!(
                    "program id index {program} outside 1..{}",
                    keys.len()
                )));
            }
            if let Some(index) = ix.accounts.iter().find(|&&i| usize::from(i) >= total) {
                return Err(invalid(format!("account index {index} outside 0..{total}")));
            }
        }

        let mut seen = BTreeSet::new();
        if let Some(duplicate) = keys.iter().find(|key| !seen.insert(*key)) {
            return Err(invalid(format!("duplicate account key {duplicate}")));
        }
        Ok(())
    }

    pub fn fee(&self, lamports_per_signature: u64) -> u64 {
        match self {
            Self::Legacy(message) => message.fee(lamports_per_signature),
            Self::V0(message) => message.fee(lamports_per_signature),
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, EncodingError> {
        match self {
            Self::Legacy(message) => message.serialize(),
            Self::V0(message) => message.serialize(),
        }
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, DecodingError> {
        let mut reader = Reader::new(bytes);
        let message = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    pub(crate) fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        match self {
            Self::Legacy(message) => message.encode_body(writer),
            Self::V0(message) => {
                writer.write_u8(MESSAGE_VERSION_PREFIX);
                message.encode_body(writer)
            }
        }
    }

    /// A first byte with the high bit set is a version prefix; otherwise it
    /// is the first header byte of a legacy message.
    pub(crate) fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        let first = reader
            .peek_u8()
            .ok_or(DecodingError::UnexpectedEndOfData {
                needed: 1,
                remaining: 0,
            })?;

        if first & MESSAGE_VERSION_PREFIX == 0 {
            return Message::decode_body(reader).map(Self::Legacy);
        }

        reader.read_u8()?;
        match first & !MESSAGE_VERSION_PREFIX {
            0 => v0::Message::decode_body(reader).map(Self::V0),
            version => Err(DecodingError::UnsupportedVersion(version)),
        }
    }
}

impl From<Message> for VersionedMessage {
    fn from(message: Message) -> Self {
        Self::Legacy(message)
    }
}

impl From<v0::Message> for VersionedMessage {
    fn from(message: v0::Message) -> Self {
        Self::V0(message)
    }
}
