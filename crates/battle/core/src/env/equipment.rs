use crate::state::TokenId;

/// Stats after applying the equipped item.
///
/// Flat modifiers can drive either stat to zero or below; the combat formula
/// clamps them. `overall_percent` is a whole-percent bonus applied to the
/// final win chance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifiedStats {
    pub attack: i64,
    pub defense: i64,
    pub overall_percent: i64,
}

impl ModifiedStats {
    pub const fn new(attack: i64, defense: i64, overall_percent: i64) -> Self {
        Self {
            attack,
            defense,
            overall_percent,
        }
    }
}

/// Read-only view of the equipment contract.
pub trait EquipmentOracle: Send + Sync {
    fn modified_stats(&self, token: TokenId) -> ModifiedStats;

    fn has_consumable_equipped(&self, token: TokenId) -> bool;
}
