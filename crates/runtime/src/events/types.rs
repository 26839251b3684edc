//! Event payloads carried by the bus.

use serde::{Deserialize, Serialize};

use battle_core::BattleEvent;

/// A battle notification stamped with the block that committed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedEvent {
    pub block_number: u64,
    pub timestamp: u64,
    pub event: BattleEvent,
}

/// A transaction the ledger rejected. Nothing it touched was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertedTx {
    pub block_number: u64,
    pub action: String,
    /// Stable code a front-end can branch on.
    pub error_code: String,
    pub reason: String,
}
