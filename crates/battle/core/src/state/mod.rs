//! Authoritative battle state representation.
//!
//! This module owns the combatant table, the append-only encounter log, the
//! cycle bookkeeping and the role table. Runtime layers clone or query this
//! state but mutate it exclusively through the engine.
pub mod types;

use std::collections::BTreeMap;

use alloy_primitives::Address;

use crate::clock::CycleClock;
use crate::config::BattleConfig;

pub use types::{
    AccessControl, BattleStatus, CombatantRecord, CycleRecord, Encounter, EncounterId, Roles,
    Timestamp, TokenId,
};

/// Errors raised while constructing a [`BattleState`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    #[error("start timestamp {start} must be in the future (now {now})")]
    StartNotInFuture { start: Timestamp, now: Timestamp },

    #[error("invalid battle config: {0}")]
    InvalidConfig(&'static str),
}

/// A broken cross-table invariant, reported by [`BattleState::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{token} is IN_BATTLE without an active encounter")]
    MissingActiveEncounter { token: TokenId },

    #[error("{token} points at {encounter} which is missing, resolved, or does not list it")]
    StaleActiveEncounter {
        token: TokenId,
        encounter: EncounterId,
    },

    #[error("{token} holds {encounter} but is not IN_BATTLE")]
    ActiveEncounterOutsideBattle {
        token: TokenId,
        encounter: EncounterId,
    },

    #[error("open {encounter} lists {token} which is not held by it")]
    OrphanedEncounter {
        encounter: EncounterId,
        token: TokenId,
    },
}

/// Canonical snapshot of the battle contract storage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub config: BattleConfig,

    /// Fixed at deployment; cycle 1 begins here.
    start_timestamp: Timestamp,

    /// Global kill switch for `StartBattle`.
    pub battles_enabled: bool,

    /// Sequential encounter id allocator (monotonically increasing, starts at 1).
    next_encounter_id: u64,

    combatants: BTreeMap<TokenId, CombatantRecord>,
    encounters: BTreeMap<EncounterId, Encounter>,
    cycles: BTreeMap<u64, CycleRecord>,

    pub access: AccessControl,
}

impl BattleState {
    /// Deploys a fresh battle state. `admin` receives every role.
    pub fn new(
        config: BattleConfig,
        start_timestamp: Timestamp,
        now: Timestamp,
        admin: Address,
    ) -> Result<Self, InitializationError> {
        if start_timestamp <= now {
            return Err(InitializationError::StartNotInFuture {
                start: start_timestamp,
                now,
            });
        }
        if config.cycle_duration == 0 {
            return Err(InitializationError::InvalidConfig(
                "cycle duration must be non-zero",
            ));
        }
        if config.admin_grace_period >= config.cycle_duration {
            return Err(InitializationError::InvalidConfig(
                "admin grace period must be shorter than a cycle",
            ));
        }
        if config.special_attack_duration >= config.cycle_duration {
            return Err(InitializationError::InvalidConfig(
                "special attack window must be shorter than a cycle",
            ));
        }

        Ok(Self {
            config,
            start_timestamp,
            battles_enabled: true,
            next_encounter_id: EncounterId::FIRST.0,
            combatants: BTreeMap::new(),
            encounters: BTreeMap::new(),
            cycles: BTreeMap::new(),
            access: AccessControl::with_admin(admin),
        })
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.start_timestamp
    }

    /// Cycle clock over this state's start timestamp and config.
    pub fn clock(&self) -> CycleClock<'_> {
        CycleClock::new(self.start_timestamp, &self.config)
    }

    // ===== combatants =====

    /// Returns the record for `token`, or the default record if none is stored.
    pub fn record(&self, token: TokenId) -> CombatantRecord {
        self.combatants.get(&token).copied().unwrap_or_default()
    }

    /// Returns records for several tokens in the requested order.
    pub fn records(&self, tokens: &[TokenId]) -> Vec<CombatantRecord> {
        tokens.iter().map(|token| self.record(*token)).collect()
    }

    pub(crate) fn record_mut(&mut self, token: TokenId) -> &mut CombatantRecord {
        self.combatants.entry(token).or_default()
    }

    /// Iterates stored records (tokens that have never been touched are absent).
    pub fn stored_records(&self) -> impl Iterator<Item = (&TokenId, &CombatantRecord)> {
        self.combatants.iter()
    }

    // ===== encounters =====

    pub fn encounter(&self, id: EncounterId) -> Option<&Encounter> {
        self.encounters.get(&id)
    }

    pub(crate) fn encounter_mut(&mut self, id: EncounterId) -> Option<&mut Encounter> {
        self.encounters.get_mut(&id)
    }

    pub fn encounters(&self) -> impl Iterator<Item = &Encounter> {
        self.encounters.values()
    }

    /// Number of encounters ever created.
    pub fn encounter_count(&self) -> u64 {
        self.next_encounter_id - EncounterId::FIRST.0
    }

    /// Id the next created encounter will receive.
    pub fn next_encounter_id(&self) -> EncounterId {
        EncounterId(self.next_encounter_id)
    }

    /// Allocates a new unique encounter id.
    pub(crate) fn allocate_encounter_id(&mut self) -> EncounterId {
        let id = EncounterId(self.next_encounter_id);
        self.next_encounter_id = self.next_encounter_id.saturating_add(1);
        id
    }

    pub(crate) fn insert_encounter(&mut self, encounter: Encounter) {
        self.encounters.insert(encounter.id, encounter);
    }

    // ===== cycles =====

    pub fn cycle(&self, number: u64) -> Option<&CycleRecord> {
        self.cycles.get(&number)
    }

    /// Returns the record for `number`, creating it on first use.
    pub(crate) fn ensure_cycle(&mut self, number: u64) -> &mut CycleRecord {
        let start_time = self.clock().cycle_start(number);
        self.cycles
            .entry(number)
            .or_insert_with(|| CycleRecord::new(start_time))
    }

    // ===== integrity =====

    /// Verifies that `InBattle` status and open encounters agree in both directions.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (&token, record) in &self.combatants {
            match (record.status, record.active_encounter) {
                (BattleStatus::InBattle, None) => {
                    return Err(InvariantViolation::MissingActiveEncounter { token });
                }
                (BattleStatus::InBattle, Some(encounter)) => {
                    let holds = self
                        .encounters
                        .get(&encounter)
                        .is_some_and(|e| !e.resolved && e.involves(token));
                    if !holds {
                        return Err(InvariantViolation::StaleActiveEncounter { token, encounter });
                    }
                }
                (_, Some(encounter)) => {
                    return Err(InvariantViolation::ActiveEncounterOutsideBattle {
                        token,
                        encounter,
                    });
                }
                (_, None) => {}
            }
        }

        for encounter in self.encounters.values().filter(|e| !e.resolved) {
            for token in [encounter.attacker, encounter.defender] {
                if self.record(token).active_encounter != Some(encounter.id) {
                    return Err(InvariantViolation::OrphanedEncounter {
                        encounter: encounter.id,
                        token,
                    });
                }
            }
        }

        Ok(())
    }

    /// SHA-256 commitment over the bincode encoding of the whole state.
    ///
    /// Maps are ordered, so equal states always produce equal roots.
    ///
    /// # Panics
    ///
    /// Never in practice: every field encodes with bincode's fixed layout.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self).expect("BattleState always encodes with bincode");
        Sha256::digest(&bytes).into()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const START: Timestamp = 1_700_000_000;

    pub fn admin() -> Address {
        Address::repeat_byte(0xad)
    }

    pub fn fresh_state() -> BattleState {
        BattleState::new(BattleConfig::default(), START, START - 1, admin())
            .expect("start is in the future")
    }

    /// Inserts an open encounter and flags both sides, bypassing validation.
    pub fn open_encounter(
        state: &mut BattleState,
        attacker: TokenId,
        defender: TokenId,
    ) -> EncounterId {
        let id = state.allocate_encounter_id();
        state.insert_encounter(Encounter::new(id, 1, attacker, defender, START));
        state.record_mut(attacker).enter(id);
        state.record_mut(defender).enter(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn rejects_start_in_the_past() {
        let result = BattleState::new(BattleConfig::default(), START, START, admin());
        assert_eq!(
            result,
            Err(InitializationError::StartNotInFuture {
                start: START,
                now: START
            })
        );
    }

    #[test]
    fn rejects_grace_period_longer_than_cycle() {
        let config = BattleConfig {
            admin_grace_period: BattleConfig::DEFAULT_CYCLE_DURATION,
            ..BattleConfig::default()
        };
        let result = BattleState::new(config, START, 0, admin());
        assert!(matches!(result, Err(InitializationError::InvalidConfig(_))));
    }

    #[test]
    fn encounter_ids_start_at_one_and_increase() {
        let mut state = fresh_state();
        assert_eq!(state.allocate_encounter_id(), EncounterId(1));
        assert_eq!(state.allocate_encounter_id(), EncounterId(2));
        assert_eq!(state.next_encounter_id(), EncounterId(3));
        assert_eq!(state.encounter_count(), 2);
    }

    #[test]
    fn untouched_tokens_read_as_ready() {
        let state = fresh_state();
        let record = state.record(TokenId(42));
        assert_eq!(record.status, BattleStatus::Ready);
        assert_eq!(record.revive_count, 0);
        assert_eq!(state.stored_records().count(), 0);
    }

    #[test]
    fn invariants_hold_for_open_encounter() {
        let mut state = fresh_state();
        open_encounter(&mut state, TokenId(1), TokenId(2));
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn invariants_catch_stale_battle_flag() {
        let mut state = fresh_state();
        let id = open_encounter(&mut state, TokenId(1), TokenId(2));
        state.encounter_mut(id).unwrap().resolved = true;

        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::StaleActiveEncounter {
                token: TokenId(1),
                encounter: id
            })
        );
    }

    #[test]
    fn cycle_records_are_created_lazily() {
        let mut state = fresh_state();
        assert!(state.cycle(3).is_none());
        let record = state.ensure_cycle(3);
        assert_eq!(
            record.start_time,
            START + 2 * BattleConfig::DEFAULT_CYCLE_DURATION
        );
        assert!(!record.completed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn state_root_tracks_mutations() {
        let mut state = fresh_state();
        let before = state.state_root();
        assert_eq!(before, state.clone().state_root());

        state.battles_enabled = false;
        assert_ne!(before, state.state_root());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn state_root_commits_to_the_encoding() {
        use sha2::{Digest, Sha256};

        let state = fresh_state();
        let encoded = bincode::serialize(&state).unwrap();
        assert!(!encoded.is_empty());
        assert_eq!(state.state_root(), <[u8; 32]>::from(Sha256::digest(&encoded)));
        assert_ne!(state.state_root(), <[u8; 32]>::from(Sha256::digest([])));
    }
}
