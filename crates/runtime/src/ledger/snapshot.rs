use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use battle_core::BattleState;

use super::BlockContext;
use crate::contracts::{EnergyToken, EquipmentRegistry, UnimonCollection};

/// Everything a ledger needs to resume: battle storage, collaborator storage
/// and the block context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub deployer: Address,
    pub battle_address: Address,
    pub block: BlockContext,
    pub state: BattleState,
    pub collection: UnimonCollection,
    pub equipment: EquipmentRegistry,
    pub energy: EnergyToken,
}
