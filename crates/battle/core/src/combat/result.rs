use alloy_primitives::U256;

use super::chance::BPS_DENOMINATOR;
use crate::state::TokenId;

/// Side of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Attacker,
    Defender,
}

/// Reduces the committed random number to a roll in `[0, 10000)`.
pub fn roll_bps(random_number: U256) -> u32 {
    let roll = random_number % U256::from(BPS_DENOMINATOR);
    // < 10000, fits in the low limb
    roll.as_limbs()[0] as u32
}

/// Attacker wins iff `random_number mod 10000 < chance_bps`.
pub fn select_winner(chance_bps: u32, random_number: U256) -> Side {
    if roll_bps(random_number) < chance_bps {
        Side::Attacker
    } else {
        Side::Defender
    }
}

/// Outcome of a resolved encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub winner: TokenId,
    pub loser: TokenId,
    pub winning_side: Side,
    /// Attacker win chance used for the draw.
    pub chance_bps: u32,
    pub roll_bps: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_reduces_the_full_word() {
        // 2^64 mod 10000 = 1616; taking only the low limb would give 0
        let random = U256::from(1u8) << 64;
        assert_eq!(roll_bps(random), 1_616);
    }

    #[test]
    fn strict_less_than_decides() {
        assert_eq!(select_winner(5_000, U256::from(4_999)), Side::Attacker);
        assert_eq!(select_winner(5_000, U256::from(5_000)), Side::Defender);
        assert_eq!(select_winner(5_000, U256::from(14_999)), Side::Attacker);
    }

    #[test]
    fn clamped_extremes_never_guarantee() {
        assert_eq!(select_winner(9_900, U256::from(9_950)), Side::Defender);
        assert_eq!(select_winner(100, U256::from(50)), Side::Attacker);
    }
}
