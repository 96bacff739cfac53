//! Collaborators the host supplies. Nothing here talks to a network or disk
//! itself.

use chain_sol::{Hash, Keypair};

use crate::error::ProviderError;

/// Where the active signing key lives.
pub trait AccountStorage {
    fn current_keypair(&self) -> Option<Keypair>;

    fn persist(&self, keypair: &Keypair) -> Result<(), ProviderError>;
}

/// Source of recent blockhashes and the fee rate that goes with them.
pub trait BlockhashProvider {
    fn recent_blockhash(&self) -> Result<Hash, ProviderError>;

    fn lamports_per_signature(&self) -> Result<u64, ProviderError>;
}
