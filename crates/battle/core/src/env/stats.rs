use alloy_primitives::Address;

use crate::state::TokenId;

/// Unmodified attack and defense levels of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub attack: u32,
    pub defense: u32,
}

impl BaseStats {
    pub const fn new(attack: u32, defense: u32) -> Self {
        Self { attack, defense }
    }

    /// Attack plus defense; the power used for special-window eligibility and
    /// revive pricing.
    pub const fn total_power(&self) -> u32 {
        self.attack.saturating_add(self.defense)
    }
}

/// Read-only view of the NFT collection.
pub trait StatOracle: Send + Sync {
    /// Current owner, or `None` if the token does not exist.
    fn owner_of(&self, token: TokenId) -> Option<Address>;

    /// Base levels, or `None` if the token does not exist.
    fn base_stats(&self, token: TokenId) -> Option<BaseStats>;

    fn exists(&self, token: TokenId) -> bool {
        self.owner_of(token).is_some()
    }
}
