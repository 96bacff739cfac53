//! Account table compilation.
//!
//! Every key referenced by a set of instructions is merged into one entry
//! carrying the union of its privileges, then laid out in the order the
//! message header describes:
//!
//! ```text
//!   writable signers      (fee payer first)
//!   readonly signers
//!   writable non-signers
//!   readonly non-signers
//! ```
//!
//! Keys keep their first-seen order inside each group.

use std::collections::BTreeMap;

use crate::error::CompileError;
use crate::instruction::{AccountMeta, CompiledInstruction, Instruction};
use crate::message::MessageHeader;
use crate::pubkey::Pubkey;
use crate::v0::{AddressLookupTableAccount, LoadedAddresses, MessageAddressTableLookup};

/// A legacy message indexes its key table with a single byte.
pub const MAX_ACCOUNT_KEYS: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct KeyFlags {
    is_signer: bool,
    is_writable: bool,
    is_invoked: bool,
}

/// Deduplicated keys of a set of instructions, fee payer first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledKeys {
    entries: Vec<(Pubkey, KeyFlags)>,
}

impl CompiledKeys {
    /// Collect and merge every key referenced by `instructions`.
    ///
    /// Without an explicit `payer`, the first signer seen becomes the fee
    /// payer. Either way the payer is promoted to a writable signer.
    pub fn compile(payer: Option<&Pubkey>, instructions: &[Instruction]) -> Result<Self, CompileError> {
        let mut order: Vec<Pubkey> = Vec::new();
        let mut flags: BTreeMap<Pubkey, KeyFlags> = BTreeMap::new();

        if let Some(payer) = payer {
            order.push(*payer);
            flags.insert(*payer, KeyFlags::default());
        }

        for ix in instructions {
            for meta in &ix.accounts {
                let entry = flags.entry(meta.pubkey).or_insert_with(|| {
                    order.push(meta.pubkey);
                    KeyFlags::default()
                });
                entry.is_signer |= meta.is_signer;
                entry.is_writable |= meta.is_writable;
            }

            let entry = flags.entry(ix.program_id).or_insert_with(|| {
                order.push(ix.program_id);
                KeyFlags::default()
            });
            entry.is_invoked = true;
        }

        let payer_position = match payer {
            Some(_) => 0,
            None => order
                .iter()
                .position(|key| flags.get(key).is_some_and(|f| f.is_signer))
                .ok_or(CompileError::MissingFeePayer)?,
        };
        let payer = order.remove(payer_position);
        order.insert(0, payer);
        if let Some(entry) = flags.get_mut(&payer) {
            entry.is_signer = true;
            entry.is_writable = true;
        }

        let entries = order
            .into_iter()
            .map(|key| (key, flags.get(&key).copied().unwrap_or_default()))
            .collect();
        Ok(Self { entries })
    }

    pub fn payer(&self) -> Option<&Pubkey> {
        self.entries.first().map(|(key, _)| key)
    }

    fn group(&self, is_signer: bool, is_writable: bool) -> impl Iterator<Item = &Pubkey> + '_ {
        self.entries
            .iter()
            .filter(move |(_, f)| f.is_signer == is_signer && f.is_writable == is_writable)
            .map(|(key, _)| key)
    }

    /// Keys in header order, each with its merged privileges.
    pub fn account_metas(&self) -> Vec<AccountMeta> {
        [(true, true), (true, false), (false, true), (false, false)]
            .into_iter()
            .flat_map(|(is_signer, is_writable)| {
                self.group(is_signer, is_writable).map(move |key| AccountMeta {
                    pubkey: *key,
                    is_signer,
                    is_writable,
                })
            })
            .collect()
    }

    /// Split into the message header and the ordered key table.
    pub fn try_into_header_and_keys(self) -> Result<(MessageHeader, Vec<Pubkey>), CompileError> {
        let metas = self.account_metas();
        if metas.len() > MAX_ACCOUNT_KEYS {
            return Err(CompileError::TooManyAccountKeys(metas.len()));
        }

        let signers = metas.iter().filter(|m| m.is_signer).count();
        let readonly_signed = metas.iter().filter(|m| m.is_signer && !m.is_writable).count();
        let readonly_unsigned = metas.iter().filter(|m| !m.is_signer && !m.is_writable).count();

        let header = MessageHeader {
            num_required_signatures: u8::try_from(signers)
                .map_err(|_| CompileError::TooManySigners(signers))?,
            num_readonly_signed_accounts: u8::try_from(readonly_signed)
                .map_err(|_| CompileError::TooManySigners(signers))?,
            num_readonly_unsigned_accounts: u8::try_from(readonly_unsigned)
                .map_err(|_| CompileError::TooManyAccountKeys(metas.len()))?,
        };

        Ok((header, metas.into_iter().map(|m| m.pubkey).collect()))
    }

    /// Move every non-signer, non-program key found in `table` out of the
    /// static key set.
    ///
    /// Returns `None` when the table contributes nothing.
    pub fn try_drain_lookups(
        &mut self,
        table: &AddressLookupTableAccount,
    ) -> Result<Option<(MessageAddressTableLookup, LoadedAddresses)>, CompileError> {
        let mut lookup = MessageAddressTableLookup {
            account_key: table.key,
            writable_indexes: Vec::new(),
            readonly_indexes: Vec::new(),
        };
        let mut loaded = LoadedAddresses::default();

        for (key, flags) in &self.entries {
            if flags.is_signer || flags.is_invoked {
                continue;
            }
            let Some(position) = table.addresses.iter().position(|address| address == key) else {
                continue;
            };
            let index = u8::try_from(position)
                .map_err(|_| CompileError::LookupTableIndexOverflow(table.key))?;
            if flags.is_writable {
                lookup.writable_indexes.push(index);
                loaded.writable.push(*key);
            } else {
                lookup.readonly_indexes.push(index);
                loaded.readonly.push(*key);
            }
        }
        self.entries
            .retain(|(key, _)| !loaded.writable.contains(key) && !loaded.readonly.contains(key));

        if lookup.writable_indexes.is_empty() && lookup.readonly_indexes.is_empty() {
            Ok(None)
        } else {
            Ok(Some((lookup, loaded)))
        }
    }
}

/// Merge and order the accounts of `instructions`.
pub fn compile_account_metas(
    payer: Option<&Pubkey>,
    instructions: &[Instruction],
) -> Result<Vec<AccountMeta>, CompileError> {
    let keys = CompiledKeys::compile(payer, instructions)?;
    let metas = keys.account_metas();
    if metas.len() > MAX_ACCOUNT_KEYS {
        return Err(CompileError::TooManyAccountKeys(metas.len()));
    }
    Ok(metas)
}

/// Replace every key reference with its index in `ordered_keys`.
pub(crate) fn compile_instructions(
    instructions: &[Instruction],
    ordered_keys: &[Pubkey],
) -> Result<Vec<CompiledInstruction>, CompileError> {
    let mut index_of: BTreeMap<&Pubkey, u8> = BTreeMap::new();
    for (index, key) in ordered_keys.iter().enumerate() {
        let index =
            u8::try_from(index).map_err(|_| CompileError::TooManyAccountKeys(ordered_keys.len()))?;
        index_of.entry(key).or_insert(index);
    }
    let lookup = |key: &Pubkey| {
        index_of
            .get(key)
            .copied()
            .ok_or(CompileError::UnknownAccount(*key))
    };

    instructions
        .iter()
        .map(|ix| -> Result<CompiledInstruction, CompileError> {
            let accounts = ix
                .accounts
                .iter()
                .map(|meta| lookup(&meta.pubkey))
                .collect::<Result<Vec<u8>, _>>()?;
            Ok(CompiledInstruction {
                program_id_index: lookup(&ix.program_id)?,
                accounts,
                data: ix.data.clone(),
            })
        })
        .collect()
}
