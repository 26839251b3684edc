//! Errors raised by the reference collaborator contracts.

use alloy_primitives::Address;
use thiserror::Error;

use battle_core::TokenId;

/// Reverts raised by the collection, equipment and energy contracts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("{caller} is not the contract owner")]
    NotContractOwner { caller: Address },

    #[error("{0} already minted")]
    AlreadyMinted(TokenId),

    #[error("{0} does not exist")]
    UnknownToken(TokenId),

    #[error("{caller} does not own {token}")]
    NotTokenOwner { token: TokenId, caller: Address },

    #[error("level {level} outside 1..={max}")]
    InvalidLevel { level: u32, max: u32 },

    #[error("item {0} is not registered")]
    UnknownItem(u64),

    #[error("item {0} already registered")]
    ItemExists(u64),

    #[error("{owner} holds no unit of item {item}")]
    NoItemBalance { owner: Address, item: u64 },

    #[error("{0} already has an item equipped")]
    SlotOccupied(TokenId),

    #[error("{0} has nothing equipped")]
    SlotEmpty(TokenId),

    #[error("{0} has no consumable equipped")]
    NoConsumable(TokenId),

    #[error("{caller} is not authorized for this capability")]
    UnauthorizedCaller { caller: Address },

    #[error("{owner} holds {available} energy, {required} required")]
    InsufficientBalance {
        owner: Address,
        required: u128,
        available: u128,
    },
}
