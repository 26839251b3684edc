/// Battle configuration constants and tunable parameters.
///
/// Durations are in seconds. The defaults reproduce the deployed contract:
/// 24h cycles, a 1h admin grace period at the tail of every cycle and a 30min
/// special-attack window at the head of every cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Length of one cycle.
    pub cycle_duration: u64,
    /// Trailing portion of each cycle reserved for admin cleanup.
    pub admin_grace_period: u64,
    /// Leading portion of each cycle with special-attack eligibility rules.
    pub special_attack_duration: u64,
    /// Per-cycle growth of the special-attack power ceiling.
    pub special_level_step: u32,
    /// Ceiling of the special-attack power band (attack + defense cap).
    pub special_level_cap: u32,
    /// Maximum number of revivals per combatant.
    pub max_revives: u32,
    /// Energy charged per unit of revive cost (18-decimal token).
    pub revive_cost_unit: u128,
    /// Maximum number of ids a single batch admin call may touch.
    pub max_batch_size: u64,
}

impl BattleConfig {
    // ===== contract constants =====
    pub const DEFAULT_CYCLE_DURATION: u64 = 24 * 60 * 60;
    pub const DEFAULT_ADMIN_GRACE_PERIOD: u64 = 60 * 60;
    pub const DEFAULT_SPECIAL_ATTACK_DURATION: u64 = 30 * 60;
    pub const DEFAULT_SPECIAL_LEVEL_STEP: u32 = 2;
    pub const DEFAULT_SPECIAL_LEVEL_CAP: u32 = 20;
    pub const DEFAULT_MAX_REVIVES: u32 = 2;
    pub const DEFAULT_REVIVE_COST_UNIT: u128 = 1_000_000_000_000_000_000;
    pub const DEFAULT_MAX_BATCH_SIZE: u64 = 500;

    /// Highest attack or defense level a combatant can reach.
    pub const MAX_LEVEL: u32 = 10;

    pub fn new() -> Self {
        Self {
            cycle_duration: Self::DEFAULT_CYCLE_DURATION,
            admin_grace_period: Self::DEFAULT_ADMIN_GRACE_PERIOD,
            special_attack_duration: Self::DEFAULT_SPECIAL_ATTACK_DURATION,
            special_level_step: Self::DEFAULT_SPECIAL_LEVEL_STEP,
            special_level_cap: Self::DEFAULT_SPECIAL_LEVEL_CAP,
            max_revives: Self::DEFAULT_MAX_REVIVES,
            revive_cost_unit: Self::DEFAULT_REVIVE_COST_UNIT,
            max_batch_size: Self::DEFAULT_MAX_BATCH_SIZE,
        }
    }

    /// Returns a copy with a different cycle length, keeping the other windows.
    pub fn with_cycle_duration(mut self, cycle_duration: u64) -> Self {
        self.cycle_duration = cycle_duration;
        self
    }

    /// Energy required to revive a combatant with the given total power.
    ///
    /// `ceil(total_power / 2)` cost units.
    pub fn revive_cost(&self, total_power: u32) -> u128 {
        u128::from(total_power.div_ceil(2)).saturating_mul(self.revive_cost_unit)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revive_cost_rounds_half_up() {
        let config = BattleConfig {
            revive_cost_unit: 1,
            ..BattleConfig::default()
        };
        assert_eq!(config.revive_cost(2), 1);
        assert_eq!(config.revive_cost(3), 2);
        assert_eq!(config.revive_cost(20), 10);
        assert_eq!(config.revive_cost(0), 0);
    }

    #[test]
    fn revive_cost_scales_by_unit() {
        let config = BattleConfig::default();
        assert_eq!(config.revive_cost(5), 3 * BattleConfig::DEFAULT_REVIVE_COST_UNIT);
    }
}
