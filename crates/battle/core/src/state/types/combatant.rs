//! Per-combatant battle status.
//!
//! ```text
//! Ready ──enter──▶ InBattle ──resolve──▶ Won  ──advance──▶ Ready
//!                                    └──▶ Lost ──advance──▶ Fainted
//! Ready ──advance──▶ Fainted ──advance──▶ Dead
//! Fainted ──revive──▶ Ready
//! ```

use strum::{EnumIter, IntoStaticStr};

use super::EncounterId;

/// Battle status of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleStatus {
    #[default]
    Ready,
    InBattle,
    Won,
    Lost,
    Fainted,
    /// Terminal.
    Dead,
}

impl BattleStatus {
    /// Status after the cycle-boundary sweep.
    ///
    /// `InBattle` is left alone: an open encounter has to be resolved (or
    /// force-resolved) before its combatants can age.
    pub const fn advanced(self) -> Self {
        match self {
            Self::Won => Self::Ready,
            Self::Lost | Self::Ready => Self::Fainted,
            Self::Fainted => Self::Dead,
            Self::InBattle => Self::InBattle,
            Self::Dead => Self::Dead,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dead)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Battle bookkeeping stored per token.
///
/// Tokens without a stored record behave as [`CombatantRecord::default`], a
/// fresh `Ready` combatant that has never been revived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantRecord {
    pub status: BattleStatus,
    pub revive_count: u32,
    /// Encounter holding this combatant in `InBattle`.
    pub active_encounter: Option<EncounterId>,
}

impl CombatantRecord {
    pub fn is_ready(&self) -> bool {
        self.status == BattleStatus::Ready
    }

    /// Moves into an encounter.
    pub fn enter(&mut self, encounter: EncounterId) {
        self.status = BattleStatus::InBattle;
        self.active_encounter = Some(encounter);
    }

    /// Leaves the active encounter with its outcome.
    pub fn settle(&mut self, won: bool) {
        self.status = if won {
            BattleStatus::Won
        } else {
            BattleStatus::Lost
        };
        self.active_encounter = None;
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn advance_table_is_exhaustive() {
        for status in BattleStatus::iter() {
            let expected = match status {
                BattleStatus::Ready => BattleStatus::Fainted,
                BattleStatus::InBattle => BattleStatus::InBattle,
                BattleStatus::Won => BattleStatus::Ready,
                BattleStatus::Lost => BattleStatus::Fainted,
                BattleStatus::Fainted => BattleStatus::Dead,
                BattleStatus::Dead => BattleStatus::Dead,
            };
            assert_eq!(status.advanced(), expected, "{}", status.as_str());
        }
    }

    #[test]
    fn two_idle_cycles_kill() {
        let status = BattleStatus::Ready.advanced().advanced();
        assert_eq!(status, BattleStatus::Dead);
        assert!(status.is_terminal());
    }

    #[test]
    fn settle_clears_active_encounter() {
        let mut record = CombatantRecord::default();
        record.enter(EncounterId(3));
        assert_eq!(record.status, BattleStatus::InBattle);
        assert_eq!(record.active_encounter, Some(EncounterId(3)));

        record.settle(false);
        assert_eq!(record.status, BattleStatus::Lost);
        assert_eq!(record.active_encounter, None);
    }

    #[test]
    fn status_names_match_contract_enum() {
        assert_eq!(BattleStatus::InBattle.as_str(), "IN_BATTLE");
        assert_eq!(BattleStatus::Fainted.as_str(), "FAINTED");
    }
}
