//! Solana transaction building and signing.
//!
//! Messages are compiled and serialized by hand against the wire format,
//! using `ed25519-dalek` for signatures and the workspace's own codec and
//! curve crates for everything else. There is no `solana-sdk` dependency and
//! no I/O: blockhashes and lookup tables come from the caller.

pub mod compiled_keys;
pub mod compute_budget;
pub mod error;
pub mod hash;
pub mod instruction;
pub mod keypair;
pub mod message;
pub mod pda;
pub mod pubkey;
pub mod signature;
pub mod system_program;
pub mod transaction;
pub mod v0;
pub mod versioned;

pub use compiled_keys::{compile_account_metas, CompiledKeys};
pub use error::{CompileError, KeypairError, PdaError, PubkeyError, SigningError, SolError};
pub use hash::Hash;
pub use instruction::{AccountMeta, CompiledInstruction, Instruction};
pub use keypair::Keypair;
pub use message::{Message, MessageHeader};
pub use pda::{associated_token_address, create_program_address, find_program_address};
pub use pubkey::Pubkey;
pub use signature::Signature;
pub use transaction::{SerializeConfig, SigningState, Transaction};
pub use v0::{AddressLookupTableAccount, MessageAddressTableLookup};
pub use versioned::VersionedMessage;
