//! Action transition dispatch.

use crate::action::{BattleAction, BattleTransition, CallContext, TransitionOutput};
use crate::env::BattleEnv;
use crate::state::BattleState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Runs a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the battle state and record outputs
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    ctx: &CallContext,
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    out: &mut TransitionOutput,
) -> Result<(), TransitionPhaseError<T::Error>>
where
    T: BattleTransition,
{
    transition
        .pre_validate(ctx, state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(ctx, state, env, out)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(ctx, state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

/// Routes an action to its transition and collects what it produced.
pub(super) fn execute_transition(
    action: &BattleAction,
    ctx: &CallContext,
    state: &mut BattleState,
    env: &BattleEnv<'_>,
) -> Result<TransitionOutput, ExecuteError> {
    let mut out = TransitionOutput::default();
    let out_ref = &mut out;

    match action {
        BattleAction::StartBattle(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::StartBattle)
        }
        BattleAction::FulfillRandomness(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::FulfillRandomness)
        }
        BattleAction::FinishThem(transition) => {
            drive_transition(transition, ctx, state, env, out_ref).map_err(ExecuteError::FinishThem)
        }
        BattleAction::Revive(transition) => {
            drive_transition(transition, ctx, state, env, out_ref).map_err(ExecuteError::Revive)
        }
        BattleAction::AdvanceStatuses(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::AdvanceStatuses)
        }
        BattleAction::ForceResolve(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::ForceResolve)
        }
        BattleAction::CompleteCycle(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::CompleteCycle)
        }
        BattleAction::SetBattlesEnabled(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::SetBattlesEnabled)
        }
        BattleAction::GrantRandomnessRole(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::GrantRandomnessRole)
        }
        BattleAction::RevokeRandomnessRole(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::RevokeRandomnessRole)
        }
        BattleAction::OverrideStatuses(transition) => {
            drive_transition(transition, ctx, state, env, out_ref)
                .map_err(ExecuteError::OverrideStatuses)
        }
    }?;

    Ok(out)
}
