//! Version 0 messages: legacy layout plus address lookup tables.
//!
//! ```text
//!   0x80                       version prefix
//!   <legacy message body>
//!   num_lookups                compact-u16
//!   lookups[]:
//!     account_key              32 bytes
//!     num_writable_indexes     compact-u16
//!     writable_indexes         u8 * n
//!     num_readonly_indexes     compact-u16
//!     readonly_indexes         u8 * n
//! ```
//!
//! Instruction indices address the static keys first, then every table's
//! writable addresses, then every table's readonly addresses.

use wire_codec::{DecodingError, EncodingError, Reader, Writer};

use crate::compiled_keys::{compile_instructions, CompiledKeys, MAX_ACCOUNT_KEYS};
use crate::error::CompileError;
use crate::hash::Hash;
use crate::instruction::{CompiledInstruction, Instruction};
use crate::message::{
    read_header, read_instructions, read_keys, read_short_bytes, read_short_len,
    write_header, write_instructions, write_keys, write_short_bytes, write_short_len,
    MessageHeader,
};
use crate::pubkey::Pubkey;

/// High bit set on the first byte marks a versioned message.
pub const MESSAGE_VERSION_PREFIX: u8 = 0x80;

/// An on-chain lookup table whose contents the caller has already fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookupTableAccount {
    pub key: Pubkey,
    pub addresses: Vec<Pubkey>,
}

/// Indexes into one lookup table, as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAddressTableLookup {
    pub account_key: Pubkey,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

/// Addresses a message pulls in through its lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedAddresses {
    pub writable: Vec<Pubkey>,
    pub readonly: Vec<Pubkey>,
}

impl LoadedAddresses {
    pub fn len(&self) -> usize {
        self.writable.len() + self.readonly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writable.is_empty() && self.readonly.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
    pub address_table_lookups: Vec<MessageAddressTableLookup>,
}

impl Message {
    /// Compile `instructions`, moving eligible accounts into `lookup_tables`.
    ///
    /// Signers and invoked programs always stay in the static key list.
    pub fn try_compile(
        payer: &Pubkey,
        instructions: &[Instruction],
        lookup_tables: &[AddressLookupTableAccount],
        recent_blockhash: Hash,
    ) -> Result<Self, CompileError> {
        let mut compiled_keys = CompiledKeys::compile(Some(payer), instructions)?;

        let mut address_table_lookups = Vec::with_capacity(lookup_tables.len());
        let mut loaded = LoadedAddresses::default();
        for table in lookup_tables {
            if let Some((lookup, addresses)) = compiled_keys.try_drain_lookups(table)? {
                address_table_lookups.push(lookup);
                loaded.writable.extend(addresses.writable);
                loaded.readonly.extend(addresses.readonly);
            }
        }

        let (header, account_keys) = compiled_keys.try_into_header_and_keys()?;

        let total = account_keys.len() + loaded.len();
        if total > MAX_ACCOUNT_KEYS {
            return Err(CompileError::TooManyAccountKeys(total));
        }

        let ordered_keys: Vec<Pubkey> = account_keys
            .iter()
            .chain(&loaded.writable)
            .chain(&loaded.readonly)
            .copied()
            .collect();
        let instructions = compile_instructions(instructions, &ordered_keys)?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
            address_table_lookups,
        })
    }

    /// Number of addresses resolved through lookup tables.
    pub fn num_lookup_addresses(&self) -> usize {
        self.address_table_lookups
            .iter()
            .map(|l| l.writable_indexes.len() + l.readonly_indexes.len())
            .sum()
    }

    pub fn fee(&self, lamports_per_signature: u64) -> u64 {
        u64::from(self.header.num_required_signatures).saturating_mul(lamports_per_signature)
    }

    pub fn serialize(&self) -> Result<Vec<u8>, EncodingError> {
        let mut writer = Writer::with_capacity(256);
        writer.write_u8(MESSAGE_VERSION_PREFIX);
        self.encode_body(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, DecodingError> {
        let mut reader = Reader::new(bytes);
        match reader.read_u8()? {
            MESSAGE_VERSION_PREFIX => {}
            other if other & MESSAGE_VERSION_PREFIX != 0 => {
                return Err(DecodingError::UnsupportedVersion(other & !MESSAGE_VERSION_PREFIX))
            }
            _ => {
                return Err(DecodingError::InvalidValue(
                    "missing version prefix".to_string(),
                ))
            }
        }
        let message = Self::decode_body(&mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    /// Everything after the version prefix.
    pub(crate) fn encode_body(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        write_header(writer, &self.header);
        write_keys(writer, &self.account_keys)?;
        writer.write_bytes(self.recent_blockhash.as_ref());
        write_instructions(writer, &self.instructions)?;

        write_short_len(writer, self.address_table_lookups.len())?;
        for lookup in &self.address_table_lookups {
            writer.write_bytes(lookup.account_key.as_ref());
            write_short_bytes(writer, &lookup.writable_indexes)?;
            write_short_bytes(writer, &lookup.readonly_indexes)?;
        }
        Ok(())
    }

    pub(crate) fn decode_body(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        let header = read_header(reader)?;
        let account_keys = read_keys(reader)?;
        let recent_blockhash = Hash::new_from_array(reader.read_array()?);
        let instructions = read_instructions(reader)?;

        let num_lookups = read_short_len(reader)?;
        let address_table_lookups = (0..num_lookups)
            .map(|_| -> Result<MessageAddressTableLookup, DecodingError> {
                Ok(MessageAddressTableLookup {
                    account_key: Pubkey::new_from_array(reader.read_array()?),
                    writable_indexes: read_short_bytes(reader)?,
                    readonly_indexes: read_short_bytes(reader)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
            address_table_lookups,
        })
    }
}
