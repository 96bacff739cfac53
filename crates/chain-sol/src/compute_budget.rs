//! Compute budget program instructions: a `u8` tag then the value,
//! little-endian.

use wire_codec::{BinaryEncode, EncodingError, Writer};

use crate::instruction::Instruction;
use crate::pubkey::Pubkey;

/// `ComputeBudget111111111111111111111111111111`
pub const ID: Pubkey = Pubkey::new_from_array([
    0x03, 0x06, 0x46, 0x6f, 0xe5, 0x21, 0x17, 0x32, 0xff, 0xec, 0xad, 0xba, 0x72, 0xc3, 0x9b, 0xe7,
    0xbc, 0x8c, 0xe5, 0xbb, 0xc5, 0xf7, 0x12, 0x6b, 0x2c, 0x43, 0x9b, 0x3a, 0x40, 0x00, 0x00, 0x00,
]);

const SET_COMPUTE_UNIT_LIMIT: u8 = 2;
const SET_COMPUTE_UNIT_PRICE: u8 = 3;

/// Cap the compute units the transaction may consume.
pub fn set_compute_unit_limit(units: u32) -> Result<Instruction, EncodingError> {
    budget_instruction(SET_COMPUTE_UNIT_LIMIT, &units)
}

/// Priority fee in micro-lamports per compute unit.
pub fn set_compute_unit_price(micro_lamports: u64) -> Result<Instruction, EncodingError> {
    budget_instruction(SET_COMPUTE_UNIT_PRICE, &micro_lamports)
}

fn budget_instruction<T: BinaryEncode>(tag: u8, value: &T) -> Result<Instruction, EncodingError> {
    let mut writer = Writer::with_capacity(9);
    writer.write(&tag)?;
    writer.write(value)?;
    Ok(Instruction::new_with_bytes(ID, writer.as_bytes(), vec![]))
}
