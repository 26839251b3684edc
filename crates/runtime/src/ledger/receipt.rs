use serde::{Deserialize, Serialize};

use battle_core::{BattleEvent, ExternalEffect, Timestamp};

/// Result of a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub block_number: u64,
    pub timestamp: Timestamp,
    /// Battle state root after the transaction.
    pub state_root: [u8; 32],
    pub events: Vec<BattleEvent>,
    /// Collaborator writes applied inside the transaction.
    pub effects: Vec<ExternalEffect>,
    /// Batch entries skipped without error.
    pub skipped: Vec<u64>,
}

impl TxReceipt {
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }
}
