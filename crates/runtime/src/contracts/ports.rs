//! Capability ports through which the battle contract writes to collaborators.
//!
//! The battle rules only ever request these two mutations. Each port checks
//! that `caller` holds the matching grant before touching its own storage.

use alloy_primitives::Address;

use battle_core::TokenId;

use super::ContractError;

/// Burns the consumable equipped on a token and clears its slot.
pub trait ConsumableBurner {
    fn consume_upon_battle(&mut self, caller: Address, token: TokenId)
    -> Result<(), ContractError>;
}

/// Spends energy from an account on behalf of an authorized contract.
pub trait EnergySpender {
    fn spend(&mut self, caller: Address, owner: Address, amount: u128)
    -> Result<(), ContractError>;
}
