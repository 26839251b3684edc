//! Privileged cycle maintenance and recovery operations.
//!
//! Range sweeps are inclusive on both ends and bounded by
//! `BattleConfig::max_batch_size`. Ids that have nothing to do are recorded in
//! [`TransitionOutput::skipped`] instead of failing the batch.

use alloy_primitives::Address;

use super::encounter::{EncounterError, resolve_encounter};
use crate::action::{BattleEvent, BattleTransition, CallContext, Permission, TransitionOutput};
use crate::env::{BattleEnv, OracleError};
use crate::error::{BattleError, ErrorKind};
use crate::randomness::fallback_random_number;
use crate::state::{BattleState, BattleStatus, EncounterId, Roles, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("invalid range {start}..={end} (at most {max} ids)")]
    InvalidRange { start: u64, end: u64, max: u64 },

    #[error("batch of {len} entries exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: u64 },

    #[error("{left} entries do not match {right} entries")]
    LengthMismatch { left: usize, right: usize },

    #[error("cycle {cycle} cannot be completed during cycle {current}")]
    InvalidCycle { cycle: u64, current: u64 },

    #[error("cycle {0} already completed")]
    CycleAlreadyCompleted(u64),

    #[error("{0} cannot be overridden into IN_BATTLE")]
    OverrideToInBattle(TokenId),

    #[error("{0} is IN_BATTLE; force-resolve its encounter first")]
    OverrideWhileInBattle(TokenId),

    #[error("{0} is DEAD")]
    OverrideDead(TokenId),

    #[error(transparent)]
    Resolution(#[from] EncounterError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for AdminError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRange { .. }
            | Self::BatchTooLarge { .. }
            | Self::LengthMismatch { .. }
            | Self::InvalidCycle { .. }
            | Self::OverrideToInBattle(_) => ErrorKind::Precondition,
            Self::CycleAlreadyCompleted(_)
            | Self::OverrideWhileInBattle(_)
            | Self::OverrideDead(_) => ErrorKind::StateConflict,
            Self::Resolution(error) => error.kind(),
            Self::Oracle(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::InvalidCycle { .. } => "INVALID_CYCLE",
            Self::CycleAlreadyCompleted(_) => "CYCLE_ALREADY_COMPLETED",
            Self::OverrideToInBattle(_) => "OVERRIDE_TO_IN_BATTLE",
            Self::OverrideWhileInBattle(_) => "OVERRIDE_WHILE_IN_BATTLE",
            Self::OverrideDead(_) => "OVERRIDE_DEAD",
            Self::Resolution(error) => error.error_code(),
            Self::Oracle(error) => error.error_code(),
        }
    }
}

fn check_range(state: &BattleState, start: u64, end: u64) -> Result<(), AdminError> {
    let max = state.config.max_batch_size;
    let within = start <= end && end - start < max;
    if within {
        Ok(())
    } else {
        Err(AdminError::InvalidRange { start, end, max })
    }
}

fn check_batch(state: &BattleState, len: usize) -> Result<(), AdminError> {
    let max = state.config.max_batch_size;
    if len as u64 > max {
        return Err(AdminError::BatchTooLarge { len, max });
    }
    Ok(())
}

/// Ages every combatant in `start..=end` across a cycle boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvanceStatusesAction {
    pub start: TokenId,
    pub end: TokenId,
}

impl AdvanceStatusesAction {
    pub fn new(start: TokenId, end: TokenId) -> Self {
        Self { start, end }
    }
}

impl BattleTransition for AdvanceStatusesAction {
    type Error = AdminError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::ADMIN)
    }

    fn pre_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        check_range(state, self.start.0, self.end.0)
    }

    fn apply(
        &self,
        _ctx: &CallContext,
        state: &mut BattleState,
        env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        let stats = env.stats()?;
        for raw in self.start.0..=self.end.0 {
            let token = TokenId(raw);
            if !stats.exists(token) {
                out.skip(raw);
                continue;
            }
            let record = state.record_mut(token);
            let from = record.status;
            record.status = from.advanced();
            out.status_changed(token, from, record.status);
        }
        Ok(())
    }
}

/// Resolves every open encounter in `start..=end`, substituting fallback
/// randomness where the provider never delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceResolveAction {
    pub start: EncounterId,
    pub end: EncounterId,
}

impl ForceResolveAction {
    pub fn new(start: EncounterId, end: EncounterId) -> Self {
        Self { start, end }
    }
}

impl BattleTransition for ForceResolveAction {
    type Error = AdminError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::ADMIN)
    }

    fn pre_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        check_range(state, self.start.0, self.end.0)
    }

    fn apply(
        &self,
        ctx: &CallContext,
        state: &mut BattleState,
        env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        for raw in self.start.0..=self.end.0 {
            let id = EncounterId(raw);
            let Some(encounter) = state.encounter_mut(id) else {
                out.skip(raw);
                continue;
            };
            if encounter.resolved || !encounter.randomness_requested {
                out.skip(raw);
                continue;
            }

            if !encounter.randomness_fulfilled {
                let random_number = fallback_random_number(ctx.now, env.prevrandao()?, id);
                encounter.random_number = random_number;
                encounter.randomness_fulfilled = true;
                out.emit(BattleEvent::RandomnessFulfilled {
                    encounter: id,
                    random_number,
                    fallback: true,
                });
            }
            let cycle = encounter.cycle_number;

            resolve_encounter(state, env, id, out)?;
            out.emit(BattleEvent::EncounterForceResolved {
                encounter: id,
                cycle,
            });
        }
        Ok(())
    }
}

/// Marks a cycle as completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteCycleAction {
    pub cycle: u64,
}

impl BattleTransition for CompleteCycleAction {
    type Error = AdminError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::ADMIN)
    }

    fn pre_validate(
        &self,
        ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        let current = state.clock().current_cycle_number(ctx.now);
        if self.cycle == 0 || self.cycle > current {
            return Err(AdminError::InvalidCycle {
                cycle: self.cycle,
                current,
            });
        }
        if state.cycle(self.cycle).is_some_and(|c| c.completed) {
            return Err(AdminError::CycleAlreadyCompleted(self.cycle));
        }
        Ok(())
    }

    fn apply(
        &self,
        _ctx: &CallContext,
        state: &mut BattleState,
        _env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        state.ensure_cycle(self.cycle).completed = true;
        out.emit(BattleEvent::CycleCompleted { cycle: self.cycle });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetBattlesEnabledAction {
    pub enabled: bool,
}

impl BattleTransition for SetBattlesEnabledAction {
    type Error = AdminError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::ADMIN)
    }

    fn apply(
        &self,
        _ctx: &CallContext,
        state: &mut BattleState,
        _env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        state.battles_enabled = self.enabled;
        out.emit(BattleEvent::BattlesToggled {
            enabled: self.enabled,
        });
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantRandomnessRoleAction {
    pub accounts: Vec<Address>,
}

impl BattleTransition for GrantRandomnessRoleAction {
    type Error = AdminError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::ADMIN)
    }

    fn pre_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        check_batch(state, self.accounts.len())
    }

    fn apply(
        &self,
        _ctx: &CallContext,
        state: &mut BattleState,
        _env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        for &account in &self.accounts {
            if state.access.grant(account, Roles::RANDOMNESS_PROVIDER) {
                out.emit(BattleEvent::RandomnessRoleGranted { account });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevokeRandomnessRoleAction {
    pub accounts: Vec<Address>,
}

impl BattleTransition for RevokeRandomnessRoleAction {
    type Error = AdminError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::ADMIN)
    }

    fn pre_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        check_batch(state, self.accounts.len())
    }

    fn apply(
        &self,
        _ctx: &CallContext,
        state: &mut BattleState,
        _env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        for &account in &self.accounts {
            if state.access.revoke(account, Roles::RANDOMNESS_PROVIDER) {
                out.emit(BattleEvent::RandomnessRoleRevoked { account });
            }
        }
        Ok(())
    }
}

/// Bulk corrective override of combatant statuses.
///
/// Bypasses the transition table, but never moves a token into or out of
/// `InBattle` (that would break the encounter binding) and never touches a
/// `Dead` token.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverrideStatusesAction {
    pub tokens: Vec<TokenId>,
    pub statuses: Vec<BattleStatus>,
}

impl BattleTransition for OverrideStatusesAction {
    type Error = AdminError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::ADMIN)
    }

    fn pre_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        if self.tokens.len() != self.statuses.len() {
            return Err(AdminError::LengthMismatch {
                left: self.tokens.len(),
                right: self.statuses.len(),
            });
        }
        check_batch(state, self.tokens.len())?;

        for (&token, &status) in self.tokens.iter().zip(&self.statuses) {
            if status == BattleStatus::InBattle {
                return Err(AdminError::OverrideToInBattle(token));
            }
            match state.record(token).status {
                BattleStatus::InBattle => return Err(AdminError::OverrideWhileInBattle(token)),
                BattleStatus::Dead => return Err(AdminError::OverrideDead(token)),
                _ => {}
            }
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
        let stats = env.stats()?;
        for (&token, &status) in self.tokens.iter().zip(&self.statuses) {
            if !stats.exists(token) {
                out.skip(token.0);
                continue;
            }
            let record = state.record_mut(token);
            let from = record.status;
            record.status = status;
            out.status_changed(token, from, status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;
    use crate::env::fixtures::World;
    use crate::state::test_support::{START, admin, fresh_state, open_encounter};

    const DAY: u64 = 24 * 3_600;

    fn run<T: BattleTransition<Error = AdminError>>(
        action: &T,
        state: &mut BattleState,
        world: &World,
    ) -> Result<TransitionOutput, AdminError> {
        let env = world.env();
        let ctx = CallContext {
            sender: admin(),
            now: world.now,
        };
        let mut out = TransitionOutput::default();
        action.pre_validate(&ctx, state, &env)?;
        action.apply(&ctx, state, &env, &mut out)?;
        action.post_validate(&ctx, state, &env)?;
        Ok(out)
    }

    fn world_with_tokens(now: u64, count: u64) -> World {
        let mut world = World::at(now);
        for id in 1..=count {
            world.mint(id, Address::repeat_byte(id as u8), 1, 1);
        }
        world
    }

    #[test]
    fn advance_applies_table_and_skips_missing() {
        let mut state = fresh_state();
        let world = world_with_tokens(START + DAY, 5);
        let statuses = [
            BattleStatus::Ready,
            BattleStatus::Won,
            BattleStatus::Lost,
            BattleStatus::Fainted,
            BattleStatus::Dead,
        ];
        for (i, status) in statuses.iter().enumerate() {
            state.record_mut(TokenId(i as u64 + 1)).status = *status;
        }

        let out = run(
            &AdvanceStatusesAction::new(TokenId(1), TokenId(6)),
            &mut state,
            &world,
        )
        .unwrap();

        let after: Vec<_> = (1..=5).map(|i| state.record(TokenId(i)).status).collect();
        assert_eq!(
            after,
            vec![
                BattleStatus::Fainted,
                BattleStatus::Ready,
                BattleStatus::Fainted,
                BattleStatus::Dead,
                BattleStatus::Dead,
            ]
        );
        assert_eq!(out.skipped, vec![6]);
        assert!(state.stored_records().all(|(token, _)| token.0 <= 5));
    }

    #[test]
    fn advance_leaves_open_battles_alone() {
        let mut state = fresh_state();
        let world = world_with_tokens(START + DAY, 2);
        open_encounter(&mut state, TokenId(1), TokenId(2));

        run(
            &AdvanceStatusesAction::new(TokenId(1), TokenId(2)),
            &mut state,
            &world,
        )
        .unwrap();

        assert_eq!(state.record(TokenId(1)).status, BattleStatus::InBattle);
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn ranges_are_validated() {
        let mut state = fresh_state();
        let world = world_with_tokens(START, 0);
        assert!(matches!(
            run(
                &AdvanceStatusesAction::new(TokenId(5), TokenId(4)),
                &mut state,
                &world
            ),
            Err(AdminError::InvalidRange { .. })
        ));
        assert!(matches!(
            run(
                &ForceResolveAction::new(EncounterId(1), EncounterId(501)),
                &mut state,
                &world
            ),
            Err(AdminError::InvalidRange { .. })
        ));
        assert!(
            run(
                &ForceResolveAction::new(EncounterId(1), EncounterId(500)),
                &mut state,
                &world
            )
            .is_ok()
        );
    }

    #[test]
    fn force_resolve_touches_only_pending() {
        let mut state = fresh_state();
        let world = world_with_tokens(START + DAY - 60, 6);

        let resolved = open_encounter(&mut state, TokenId(1), TokenId(2));
        {
            let encounter = state.encounter_mut(resolved).unwrap();
            encounter.randomness_fulfilled = true;
            encounter.random_number = U256::from(1);
        }
        let env = world.env();
        let mut scratch = TransitionOutput::default();
        resolve_encounter(&mut state, &env, resolved, &mut scratch).unwrap();

        let unrequested = open_encounter(&mut state, TokenId(3), TokenId(4));
        state.encounter_mut(unrequested).unwrap().randomness_requested = false;
        let pending = open_encounter(&mut state, TokenId(5), TokenId(6));

        let before_resolved = state.encounter(resolved).cloned();
        let before_unrequested = state.encounter(unrequested).cloned();

        let out = run(
            &ForceResolveAction::new(resolved, pending),
            &mut state,
            &world,
        )
        .unwrap();

        assert_eq!(state.encounter(resolved).cloned(), before_resolved);
        assert_eq!(state.encounter(unrequested).cloned(), before_unrequested);
        assert_eq!(out.skipped, vec![resolved.0, unrequested.0]);

        let swept = state.encounter(pending).unwrap();
        assert!(swept.resolved);
        assert_eq!(
            swept.random_number,
            fallback_random_number(world.now, world.prevrandao, pending)
        );
        assert!(out.events.contains(&BattleEvent::EncounterForceResolved {
            encounter: pending,
            cycle: 1
        }));
        assert_ne!(state.record(TokenId(5)).status, BattleStatus::InBattle);
    }

    #[test]
    fn complete_cycle_bounds() {
        let mut state = fresh_state();
        let world = World::at(START + DAY + 5);

        assert_eq!(
            run(&CompleteCycleAction { cycle: 3 }, &mut state, &world),
            Err(AdminError::InvalidCycle {
                cycle: 3,
                current: 2
            })
        );
        run(&CompleteCycleAction { cycle: 1 }, &mut state, &world).unwrap();
        assert!(state.cycle(1).unwrap().completed);
        assert_eq!(
            run(&CompleteCycleAction { cycle: 1 }, &mut state, &world),
            Err(AdminError::CycleAlreadyCompleted(1))
        );
    }

    #[test]
    fn override_guards_battle_binding() {
        let mut state = fresh_state();
        let world = world_with_tokens(START, 3);
        open_encounter(&mut state, TokenId(1), TokenId(2));

        let into_battle = OverrideStatusesAction {
            tokens: vec![TokenId(3)],
            statuses: vec![BattleStatus::InBattle],
        };
        assert_eq!(
            run(&into_battle, &mut state, &world),
            Err(AdminError::OverrideToInBattle(TokenId(3)))
        );

        let out_of_battle = OverrideStatusesAction {
            tokens: vec![TokenId(1)],
            statuses: vec![BattleStatus::Ready],
        };
        assert_eq!(
            run(&out_of_battle, &mut state, &world),
            Err(AdminError::OverrideWhileInBattle(TokenId(1)))
        );

        let fix = OverrideStatusesAction {
            tokens: vec![TokenId(3)],
            statuses: vec![BattleStatus::Fainted],
        };
        run(&fix, &mut state, &world).unwrap();
        assert_eq!(state.record(TokenId(3)).status, BattleStatus::Fainted);
    }

    #[test]
    fn oversized_lists_are_rejected() {
        let mut state = fresh_state();
        let world = World::at(START);

        let tokens: Vec<_> = (1..=501).map(TokenId).collect();
        let statuses = vec![BattleStatus::Fainted; tokens.len()];
        assert!(matches!(
            run(&OverrideStatusesAction { tokens, statuses }, &mut state, &world),
            Err(AdminError::BatchTooLarge { len: 501, max: 500 })
        ));

        let grant = GrantRandomnessRoleAction {
            accounts: vec![Address::repeat_byte(9); 501],
        };
        let error = run(&grant, &mut state, &world).unwrap_err();
        assert_eq!(error.error_code(), "BATCH_TOO_LARGE");
        assert!(!state.access.has(Address::repeat_byte(9), Roles::RANDOMNESS_PROVIDER));
    }

    #[test]
    fn role_grants_report_changes_only() {
        let mut state = fresh_state();
        let world = World::at(START);
        let bot = Address::repeat_byte(9);

        let grant = GrantRandomnessRoleAction {
            accounts: vec![bot, bot],
        };
        let out = run(&grant, &mut state, &world).unwrap();
        assert_eq!(out.events, vec![BattleEvent::RandomnessRoleGranted { account: bot }]);
        assert!(state.access.has(bot, Roles::RANDOMNESS_PROVIDER));

        let revoke = RevokeRandomnessRoleAction {
            accounts: vec![bot],
        };
        run(&revoke, &mut state, &world).unwrap();
        assert!(!state.access.has(bot, Roles::RANDOMNESS_PROVIDER));
    }
}
