//! Entering and resolving encounters.

use crate::action::{
    BattleEvent, BattleTransition, CallContext, ExternalEffect, Permission, TransitionOutput,
};
use crate::combat::{Resolution, Side, roll_bps, select_winner, win_chance_bps};
use crate::env::{BattleEnv, OracleError};
use crate::error::{BattleError, ErrorKind};
use crate::state::{BattleState, BattleStatus, Encounter, EncounterId, TokenId};

/// Errors raised while entering or resolving an encounter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("battles are disabled")]
    BattlesDisabled,

    #[error("outside the battle window")]
    OutsideBattleWindow,

    #[error("{0} cannot battle itself")]
    SelfBattle(TokenId),

    #[error("attacker power {power} exceeds the special attack limit {max}")]
    AttackerAboveSpecialLimit { power: u32, max: u32 },

    #[error("defender power {defender} is below attacker power {attacker} during the special window")]
    DefenderBelowAttacker { attacker: u32, defender: u32 },

    #[error("{token} not ready ({status:?})")]
    NotReady { token: TokenId, status: BattleStatus },

    #[error("opponent {token} not ready ({status:?})")]
    OpponentNotReady { token: TokenId, status: BattleStatus },

    #[error("{0} does not exist")]
    EncounterNotFound(EncounterId),

    #[error("{0} already resolved")]
    AlreadyResolved(EncounterId),

    #[error("randomness for {0} not fulfilled")]
    RandomnessNotFulfilled(EncounterId),

    #[error("post-condition failed: {0}")]
    PostCondition(&'static str),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for EncounterError {
    fn kind(&self) -> ErrorKind {
        use EncounterError::*;
        match self {
            BattlesDisabled
            | OutsideBattleWindow
            | SelfBattle(_)
            | AttackerAboveSpecialLimit { .. }
            | DefenderBelowAttacker { .. }
            | EncounterNotFound(_) => ErrorKind::Precondition,
            NotReady { .. }
            | OpponentNotReady { .. }
            | AlreadyResolved(_)
            | RandomnessNotFulfilled(_) => ErrorKind::StateConflict,
            PostCondition(_) => ErrorKind::Internal,
            Oracle(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        use EncounterError::*;
        match self {
            BattlesDisabled => "BATTLES_DISABLED",
            OutsideBattleWindow => "OUTSIDE_BATTLE_WINDOW",
            SelfBattle(_) => "SELF_BATTLE",
            AttackerAboveSpecialLimit { .. } => "SPECIAL_ATTACK_LEVEL_EXCEEDED",
            DefenderBelowAttacker { .. } => "SPECIAL_ATTACK_TARGET_TOO_WEAK",
            NotReady { .. } => "NOT_READY",
            OpponentNotReady { .. } => "OPPONENT_NOT_READY",
            EncounterNotFound(_) => "ENCOUNTER_NOT_FOUND",
            AlreadyResolved(_) => "ALREADY_RESOLVED",
            RandomnessNotFulfilled(_) => "RANDOMNESS_NOT_FULFILLED",
            PostCondition(_) => "ENCOUNTER_POST_CONDITION",
            Oracle(error) => error.error_code(),
        }
    }
}

/// `startBattle(attacker, defender)`: owner of `attacker` challenges `defender`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartBattleAction {
    pub attacker: TokenId,
    pub defender: TokenId,
}

impl StartBattleAction {
    pub fn new(attacker: TokenId, defender: TokenId) -> Self {
        Self { attacker, defender }
    }
}

impl BattleTransition for StartBattleAction {
    type Error = EncounterError;

    fn permission(&self) -> Permission {
        Permission::TokenOwner(self.attacker)
    }

    fn pre_validate(
        &self,
        ctx: &CallContext,
        state: &BattleState,
        env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        if !state.battles_enabled {
            return Err(EncounterError::BattlesDisabled);
        }
        let clock = state.clock();
        if !clock.is_within_battle_window(ctx.now) {
            return Err(EncounterError::OutsideBattleWindow);
        }
        if self.attacker == self.defender {
            return Err(EncounterError::SelfBattle(self.attacker));
        }

        // Eligibility uses unmodified stats; resolution uses equipped stats.
        let attacker_power = env.base_stats(self.attacker)?.total_power();
        let defender_power = env.base_stats(self.defender)?.total_power();
        if clock.is_within_special_attack_period(ctx.now) {
            let range = clock.special_attack_level_range(ctx.now);
            if attacker_power > range.max {
                return Err(EncounterError::AttackerAboveSpecialLimit {
                    power: attacker_power,
                    max: range.max,
                });
            }
            if defender_power < attacker_power {
                return Err(EncounterError::DefenderBelowAttacker {
                    attacker: attacker_power,
                    defender: defender_power,
                });
            }
        }

        let attacker = state.record(self.attacker);
        if !attacker.is_ready() {
            return Err(EncounterError::NotReady {
                token: self.attacker,
                status: attacker.status,
            });
        }
        let defender = state.record(self.defender);
        if !defender.is_ready() {
            return Err(EncounterError::OpponentNotReady {
                token: self.defender,
                status: defender.status,
            });
        }

        Ok(())
    }

    fn apply(
        &self,
        ctx: &CallContext,
        state: &mut BattleState,
        _env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        let cycle = state.clock().current_cycle_number(ctx.now);
        state.ensure_cycle(cycle);

        let id = state.allocate_encounter_id();
        state.insert_encounter(Encounter::new(
            id,
            cycle,
            self.attacker,
            self.defender,
            ctx.now,
        ));

        for token in [self.attacker, self.defender] {
            let record = state.record_mut(token);
            let from = record.status;
            record.enter(id);
            out.status_changed(token, from, BattleStatus::InBattle);
        }

        out.emit(BattleEvent::BattleStarted {
            encounter: id,
            attacker: self.attacker,
            defender: self.defender,
            cycle,
        });
        out.emit(BattleEvent::RandomnessRequested {
            encounter: id,
            cycle,
        });
        Ok(())
    }

    fn post_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        let attacker = state.record(self.attacker);
        let defender = state.record(self.defender);
        if attacker.status != BattleStatus::InBattle || defender.status != BattleStatus::InBattle {
            return Err(EncounterError::PostCondition("combatants not in battle"));
        }
        if attacker.active_encounter.is_none()
            || attacker.active_encounter != defender.active_encounter
        {
            return Err(EncounterError::PostCondition(
                "combatants not bound to the same encounter",
            ));
        }
        Ok(())
    }
}

/// `finishThem(encounterId)`: anyone may resolve a fulfilled encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinishThemAction {
    pub encounter: EncounterId,
}

impl FinishThemAction {
    pub fn new(encounter: EncounterId) -> Self {
        Self { encounter }
    }
}

impl BattleTransition for FinishThemAction {
    type Error = EncounterError;

    fn permission(&self) -> Permission {
        Permission::Anyone
    }

    fn pre_validate(
        &self,
        ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        if !state.clock().is_within_battle_window(ctx.now) {
            return Err(EncounterError::OutsideBattleWindow);
        }
        let encounter = state
            .encounter(self.encounter)
            .ok_or(EncounterError::EncounterNotFound(self.encounter))?;
        if encounter.resolved {
            return Err(EncounterError::AlreadyResolved(self.encounter));
        }
        if !encounter.randomness_fulfilled {
            return Err(EncounterError::RandomnessNotFulfilled(self.encounter));
        }
        Ok(())
    }

    fn apply(
        &self,
        _ctx: &CallContext,
        state: &mut BattleState,
        env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        resolve_encounter(state, env, self.encounter, out).map(|_| ())
    }

    fn post_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        match state.encounter(self.encounter) {
            Some(encounter) if encounter.resolved && encounter.winner.is_some() => Ok(()),
            _ => Err(EncounterError::PostCondition("encounter not resolved")),
        }
    }
}

/// Draws the winner of a fulfilled encounter and settles both combatants.
///
/// Shared by `finishThem` and the admin sweep. Requests a consumable burn for
/// each side that has one equipped, win or lose.
pub(crate) fn resolve_encounter(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    id: EncounterId,
    out: &mut TransitionOutput,
) -> Result<Resolution, EncounterError> {
    let encounter = state
        .encounter(id)
        .cloned()
        .ok_or(EncounterError::EncounterNotFound(id))?;
    if encounter.resolved {
        return Err(EncounterError::AlreadyResolved(id));
    }
    if !encounter.randomness_fulfilled {
        return Err(EncounterError::RandomnessNotFulfilled(id));
    }

    let equipment = env.equipment()?;
    let attacker_stats = equipment.modified_stats(encounter.attacker);
    let defender_stats = equipment.modified_stats(encounter.defender);
    let chance_bps = win_chance_bps(attacker_stats, defender_stats);

    let winning_side = select_winner(chance_bps, encounter.random_number);
    let (winner, loser) = match winning_side {
        Side::Attacker => (encounter.attacker, encounter.defender),
        Side::Defender => (encounter.defender, encounter.attacker),
    };
    let resolution = Resolution {
        winner,
        loser,
        winning_side,
        chance_bps,
        roll_bps: roll_bps(encounter.random_number),
    };

    if let Some(stored) = state.encounter_mut(id) {
        stored.resolved = true;
        stored.winner = Some(winner);
    }
    for (token, won) in [(winner, true), (loser, false)] {
        let record = state.record_mut(token);
        let from = record.status;
        record.settle(won);
        let to = record.status;
        out.status_changed(token, from, to);
    }

    out.emit(BattleEvent::BattleFinished {
        encounter: id,
        cycle: encounter.cycle_number,
        resolution,
    });

    for token in [winner, loser] {
        if equipment.has_consumable_equipped(token) {
            out.request(ExternalEffect::BurnConsumable { token });
        }
    }

    Ok(resolution)
}
