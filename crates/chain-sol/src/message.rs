//! Legacy message wire format.
//!
//! ```text
//! Message:
//!   num_required_sigs     u8
//!   num_readonly_signed   u8
//!   num_readonly_unsigned u8
//!   num_accounts          compact-u16
//!   account_keys          32 bytes * num_accounts
//!   recent_blockhash      32 bytes
//!   num_instructions      compact-u16
//!   instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index      u8
//!   num_accounts          compact-u16
//!   account_indices       u8 * num_accounts
//!   data_len              compact-u16
//!   data                  u8 * data_len
//! ```

use wire_codec::{DecodingError, EncodingError, Reader, Writer};

use crate::compiled_keys::{compile_instructions, CompiledKeys};
use crate::error::CompileError;
use crate::hash::Hash;
use crate::instruction::{CompiledInstruction, Instruction};
use crate::pubkey::Pubkey;

pub const MESSAGE_HEADER_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// The first `num_required_signatures` keys sign the transaction.
    pub num_required_signatures: u8,
    /// Trailing read-only keys within the signer group.
    pub num_readonly_signed_accounts: u8,
    /// Trailing read-only keys within the non-signer group.
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile `instructions` into a message.
    ///
    /// `payer` of `None` makes the first signer referenced by the
    /// instructions pay the fee.
    pub fn try_compile(
        payer: Option<&Pubkey>,
        instructions: &[Instruction],
        recent_blockhash: Hash,
    ) -> Result<Self, CompileError> {
        let (header, account_keys) =
            CompiledKeys::compile(payer, instructions)?.try_into_header_and_keys()?;
        let instructions = compile_instructions(instructions, &account_keys)?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.account_keys.first()
    }

    /// Keys that must sign, in signature slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let end = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..end]
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < usize::from(self.header.num_required_signatures)
    }

    pub fn is_writable(&self, index: usize) -> bool {
        is_writable_index(&self.header, self.account_keys.len(), index)
    }

    /// Fee for this message at `lamports_per_signature`.
    pub fn fee(&self, lamports_per_signature: u64) -> u64 {
        u64::from(self.header.num_required_signatures).saturating_mul(lamports_per_signature)
    }

    /// The bytes that get signed.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodingError> {
        let mut writer = Writer::with_capacity(256);
        self.encode_body(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, DecodingError> {
        let mut reader = Reader::new(bytes);
        let message = Self::decode_body(&mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    pub(crate) fn encode_body(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        write_header(writer, &self.header);
        write_keys(writer, &self.account_keys)?;
        writer.write_bytes(self.recent_blockhash.as_ref());
        write_instructions(writer, &self.instructions)
    }

    pub(crate) fn decode_body(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        let header = read_header(reader)?;
        let account_keys = read_keys(reader)?;
        let recent_blockhash = Hash::new_from_array(reader.read_array()?);
        let instructions = read_instructions(reader)?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }
}

pub(crate) fn is_writable_index(header: &MessageHeader, num_keys: usize, index: usize) -> bool {
    let signers = usize::from(header.num_required_signatures);
    if index < signers {
        index < signers - usize::from(header.num_readonly_signed_accounts).min(signers)
    } else {
        let unsigned = num_keys.saturating_sub(signers);
        index - signers < unsigned.saturating_sub(usize::from(header.num_readonly_unsigned_accounts))
    }
}

pub(crate) fn write_header(writer: &mut Writer, header: &MessageHeader) {
    writer.write_u8(header.num_required_signatures);
    writer.write_u8(header.num_readonly_signed_accounts);
    writer.write_u8(header.num_readonly_unsigned_accounts);
}

pub(crate) fn read_header(reader: &mut Reader<'_>) -> Result<MessageHeader, DecodingError> {
    Ok(MessageHeader {
        num_required_signatures: reader.read_u8()?,
        num_readonly_signed_accounts: reader.read_u8()?,
        num_readonly_unsigned_accounts: reader.read_u8()?,
    })
}

pub(crate) fn write_keys(writer: &mut Writer, keys: &[Pubkey]) -> Result<(), EncodingError> {
    write_short_len(writer, keys.len())?;
    for key in keys {
        writer.write_bytes(key.as_ref());
    }
    Ok(())
}

pub(crate) fn read_keys(reader: &mut Reader<'_>) -> Result<Vec<Pubkey>, DecodingError> {
    let len = read_short_len(reader)?;
    (0..len)
        .map(|_| reader.read_array().map(Pubkey::new_from_array))
        .collect()
}

pub(crate) fn write_instructions(
    writer: &mut Writer,
    instructions: &[CompiledInstruction],
) -> Result<(), EncodingError> {
    write_short_len(writer, instructions.len())?;
    for ix in instructions {
        writer.write_u8(ix.program_id_index);
        write_short_bytes(writer, &ix.accounts)?;
        write_short_bytes(writer, &ix.data)?;
    }
    Ok(())
}

pub(crate) fn read_instructions(
    reader: &mut Reader<'_>,
) -> Result<Vec<CompiledInstruction>, DecodingError> {
    let len = read_short_len(reader)?;
    (0..len)
        .map(|_| -> Result<CompiledInstruction, DecodingError> {
            Ok(CompiledInstruction {
                program_id_index: reader.read_u8()?,
                accounts: read_short_bytes(reader)?,
                data: read_short_bytes(reader)?,
            })
        })
        .collect()
}

pub(crate) fn write_short_bytes(writer: &mut Writer, bytes: &[u8]) -> Result<(), EncodingError> {
    write_short_len(writer, bytes.len())?;
    writer.write_bytes(bytes);
    Ok(())
}

pub(crate) fn read_short_bytes(reader: &mut Reader<'_>) -> Result<Vec<u8>, DecodingError> {
    let len = read_short_len(reader)?;
    Ok(reader.read_bytes(len)?.to_vec())
}

/// Sequence counts inside a message never exceed `u16::MAX`.
pub(crate) fn write_short_len(writer: &mut Writer, len: usize) -> Result<(), EncodingError> {
    if len > usize::from(u16::MAX) {
        return Err(EncodingError::LengthOverflow(len));
    }
    writer.write_compact_len(len)
}

pub(crate) fn read_short_len(reader: &mut Reader<'_>) -> Result<usize, DecodingError> {
    let len = reader.read_compact_len()?;
    if len > usize::from(u16::MAX) {
        return Err(DecodingError::LengthOverflow);
    }
    Ok(len)
}
