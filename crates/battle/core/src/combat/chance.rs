//! Attacker win probability.
//!
//! Formula (basis points):
//! ```text
//! atk    = max(attacker.attack, 1)      (values <= 0 clamp to 1)
//! def    = max(defender.defense, 1)
//! base   = atk * 10000 / (atk + def)
//! final  = base - (defender.overall% - attacker.overall%) * 100
//! chance = clamp(final, 100, 9900)
//! ```
//! Only the attacker's offense and the defender's defense take part. The
//! clamp keeps every encounter between 1% and 99%.

use crate::env::ModifiedStats;

/// Denominator of every chance and roll.
pub const BPS_DENOMINATOR: u32 = 10_000;
pub const MIN_CHANCE_BPS: u32 = 100;
pub const MAX_CHANCE_BPS: u32 = 9_900;

/// Basis points per whole percent of overall bonus.
const BPS_PER_PERCENT: i128 = 100;

fn floor_to_one(value: i64) -> i128 {
    if value <= 0 { 1 } else { i128::from(value) }
}

/// Attacker win chance in basis points, always within `[100, 9900]`.
pub fn win_chance_bps(attacker: ModifiedStats, defender: ModifiedStats) -> u32 {
    let attack = floor_to_one(attacker.attack);
    let defense = floor_to_one(defender.defense);

    let base = attack * i128::from(BPS_DENOMINATOR) / (attack + defense);
    let percent_delta =
        i128::from(defender.overall_percent) - i128::from(attacker.overall_percent);
    let adjusted = base.saturating_sub(percent_delta.saturating_mul(BPS_PER_PERCENT));

    let clamped = adjusted.clamp(i128::from(MIN_CHANCE_BPS), i128::from(MAX_CHANCE_BPS));
    // within [100, 9900] after the clamp
    clamped as u32
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn stats(attack: i64, defense: i64, percent: i64) -> ModifiedStats {
        ModifiedStats::new(attack, defense, percent)
    }

    #[test]
    fn equal_stats_are_a_coin_flip() {
        assert_eq!(win_chance_bps(stats(1, 1, 0), stats(1, 1, 0)), 5_000);
        assert_eq!(win_chance_bps(stats(7, 2, 0), stats(3, 7, 0)), 5_000);
    }

    #[test]
    fn uses_attacker_offense_and_defender_defense_only() {
        // attacker defense and defender attack are ignored
        let a = win_chance_bps(stats(3, 10, 0), stats(10, 1, 0));
        let b = win_chance_bps(stats(3, 1, 0), stats(1, 1, 0));
        assert_eq!(a, b);
        assert_eq!(a, 7_500);
    }

    #[test]
    fn ratio_truncates_toward_zero() {
        // 2 * 10000 / 3 = 6666.67
        assert_eq!(win_chance_bps(stats(2, 0, 0), stats(0, 1, 0)), 6_666);
    }

    #[test]
    fn defender_bonus_hurts_attacker() {
        assert_eq!(win_chance_bps(stats(5, 5, 0), stats(5, 5, 10)), 4_000);
        assert_eq!(win_chance_bps(stats(5, 5, 10), stats(5, 5, 0)), 6_000);
        assert_eq!(win_chance_bps(stats(5, 5, 10), stats(5, 5, 10)), 5_000);
    }

    #[test]
    fn non_positive_stats_floor_to_one() {
        assert_eq!(win_chance_bps(stats(-4, 0, 0), stats(0, 0, 0)), 5_000);
        assert_eq!(win_chance_bps(stats(0, 0, 0), stats(0, 1, 0)), 5_000);
    }

    #[test]
    fn extreme_inputs_clamp() {
        assert_eq!(win_chance_bps(stats(1_000, 0, 0), stats(0, 1, 0)), MAX_CHANCE_BPS);
        assert_eq!(win_chance_bps(stats(1, 0, 0), stats(0, 1_000, 0)), MIN_CHANCE_BPS);
        assert_eq!(
            win_chance_bps(stats(i64::MAX, 0, i64::MAX), stats(0, i64::MIN, i64::MIN)),
            MAX_CHANCE_BPS
        );
        assert_eq!(
            win_chance_bps(stats(i64::MIN, 0, i64::MIN), stats(0, i64::MAX, i64::MAX)),
            MIN_CHANCE_BPS
        );
    }

    #[test]
    fn chance_always_within_bounds_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..10_000 {
            let attacker = stats(
                rng.gen_range(-1_000..=1_000),
                rng.gen_range(-1_000..=1_000),
                rng.gen_range(-500..=500),
            );
            let defender = stats(
                rng.gen_range(-1_000..=1_000),
                rng.gen_range(-1_000..=1_000),
                rng.gen_range(-500..=500),
            );
            let chance = win_chance_bps(attacker, defender);
            assert!(
                (MIN_CHANCE_BPS..=MAX_CHANCE_BPS).contains(&chance),
                "{attacker:?} vs {defender:?} gave {chance}"
            );
        }
    }
}
