//! System program instructions.
//!
//! Payloads are a little-endian `u32` variant tag followed by the variant's
//! fields in declaration order.

use wire_codec::{BinaryDecode, BinaryEncode, DecodingError, EncodingError, Reader, Writer};

use crate::instruction::{AccountMeta, Instruction};
use crate::pubkey::Pubkey;

/// `11111111111111111111111111111111`
pub const ID: Pubkey = Pubkey::new_from_array([0u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemInstruction {
    /// Tag 0.
    CreateAccount { lamports: u64, space: u64, owner: Pubkey },
    /// Tag 1.
    Assign { owner: Pubkey },
    /// Tag 2.
    Transfer { lamports: u64 },
    /// Tag 8.
    Allocate { space: u64 },
}

impl SystemInstruction {
    fn tag(&self) -> u32 {
        match self {
            Self::CreateAccount { .. } => 0,
            Self::Assign { .. } => 1,
            Self::Transfer { .. } => 2,
            Self::Allocate { .. } => 8,
        }
    }

    fn into_instruction(self, accounts: Vec<AccountMeta>) -> Result<Instruction, EncodingError> {
        Instruction::new_with_binary(ID, &self, accounts)
    }
}

impl BinaryEncode for SystemInstruction {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        writer.write(&self.tag())?;
        match self {
            Self::CreateAccount {
                lamports,
                space,
                owner,
            } => {
                writer.write(lamports)?;
                writer.write(space)?;
                writer.write(owner)
            }
            Self::Assign { owner } => writer.write(owner),
            Self::Transfer { lamports } => writer.write(lamports),
            Self::Allocate { space } => writer.write(space),
        }
    }
}

impl BinaryDecode for SystemInstruction {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        match reader.read::<u32>()? {
            0 => Ok(Self::CreateAccount {
                lamports: reader.read()?,
                space: reader.read()?,
                owner: reader.read()?,
            }),
            1 => Ok(Self::Assign {
                owner: reader.read()?,
            }),
            2 => Ok(Self::Transfer {
                lamports: reader.read()?,
            }),
            8 => Ok(Self::Allocate {
                space: reader.read()?,
            }),
            tag => Err(DecodingError::InvalidValue(format!(
                "unknown system instruction tag {tag}"
            ))),
        }
    }
}

/// Move `lamports` from `from` (signer) to `to`.
pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<Instruction, EncodingError> {
    SystemInstruction::Transfer { lamports }.into_instruction(vec![
        AccountMeta::new(*from, true),
        AccountMeta::new(*to, false),
    ])
}

/// Fund and allocate a new account owned by `owner`. Both `from` and `to`
/// sign.
pub fn create_account(
    from: &Pubkey,
    to: &Pubkey,
    lamports: u64,
    space: u64,
    owner: &Pubkey,
) -> Result<Instruction, EncodingError> {
    SystemInstruction::CreateAccount {
        lamports,
        space,
        owner: *owner,
    }
    .into_instruction(vec![
        AccountMeta::new(*from, true),
        AccountMeta::new(*to, true),
    ])
}

pub fn assign(pubkey: &Pubkey, owner: &Pubkey) -> Result<Instruction, EncodingError> {
    SystemInstruction::Assign { owner: *owner }
        .into_instruction(vec![AccountMeta::new(*pubkey, true)])
}

pub fn allocate(pubkey: &Pubkey, space: u64) -> Result<Instruction, EncodingError> {
    SystemInstruction::Allocate { space }.into_instruction(vec![AccountMeta::new(*pubkey, true)])
}
