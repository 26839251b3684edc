//! Transaction execution pipeline.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`]. It
//! authorizes the sender, runs the transition phases against a scratch copy
//! of the state and commits the copy only when every phase succeeds, so a
//! rejected transaction never leaves a partial write behind.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{BattleEvent, CallContext, ExternalEffect, Permission, Transaction};
use crate::env::BattleEnv;
use crate::state::BattleState;

/// Complete outcome of a committed transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Notifications in emission order.
    pub events: Vec<BattleEvent>,

    /// Collaborator writes the host must apply within the same transaction.
    pub effects: Vec<ExternalEffect>,

    /// Batch entries skipped without error.
    pub skipped: Vec<u64>,
}

/// Battle engine that authorizes and executes transactions.
///
/// All mutations flow through the three-phase action pipeline:
/// pre_validate → apply → post_validate
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    /// Executes `tx` at the timestamp reported by the chain oracle.
    pub fn execute(
        &mut self,
        env: BattleEnv<'_>,
        tx: &Transaction,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let now = env.now()?;
        self.authorize(&env, tx)?;

        let ctx = CallContext {
            sender: tx.sender,
            now,
        };
        let mut scratch = self.state.clone();
        let output = transition::execute_transition(&tx.action, &ctx, &mut scratch, &env)?;
        *self.state = scratch;

        Ok(ExecutionOutcome {
            events: output.events,
            effects: output.effects,
            skipped: output.skipped,
        })
    }

    fn authorize(&self, env: &BattleEnv<'_>, tx: &Transaction) -> Result<(), ExecuteError> {
        match tx.action.permission() {
            Permission::Anyone => Ok(()),
            Permission::TokenOwner(token) => {
                if env.owner_of(token)? == tx.sender {
                    Ok(())
                } else {
                    Err(ExecuteError::NotTokenOwner {
                        token,
                        sender: tx.sender,
                    })
                }
            }
            Permission::Role(required) => {
                if self.state.access.has(tx.sender, required) {
                    Ok(())
                } else {
                    Err(ExecuteError::MissingRole {
                        sender: tx.sender,
                        required,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;
    use crate::action::{
        BattleAction, EncounterError, FulfillRandomnessAction, SetBattlesEnabledAction,
    };
    use crate::env::fixtures::World;
    use crate::error::{BattleError, ErrorKind};
    use crate::state::test_support::{START, admin, fresh_state};
    use crate::state::{BattleStatus, EncounterId, Roles, TokenId};

    fn owner(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn world() -> World {
        let mut world = World::at(START + 3_600);
        world.mint(1, owner(1), 1, 1);
        world.mint(2, owner(2), 1, 1);
        world
    }

    #[test]
    fn only_the_owner_can_attack() {
        let mut state = fresh_state();
        let world = world();
        let tx = Transaction::new(owner(2), BattleAction::start_battle(TokenId(1), TokenId(2)));

        let err = BattleEngine::new(&mut state)
            .execute(world.env(), &tx)
            .unwrap_err();

        assert_eq!(
            err,
            ExecuteError::NotTokenOwner {
                token: TokenId(1),
                sender: owner(2)
            }
        );
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.error_code(), "NOT_TOKEN_OWNER");
    }

    #[test]
    fn provider_role_is_required_to_fulfil() {
        let mut state = fresh_state();
        let world = world();
        let tx = Transaction::new(
            owner(1),
            BattleAction::FulfillRandomness(FulfillRandomnessAction::single(
                EncounterId(1),
                U256::from(1),
            )),
        );

        let err = BattleEngine::new(&mut state)
            .execute(world.env(), &tx)
            .unwrap_err();

        assert_eq!(
            err,
            ExecuteError::MissingRole {
                sender: owner(1),
                required: Roles::RANDOMNESS_PROVIDER
            }
        );
    }

    #[test]
    fn rejected_transactions_leave_state_untouched() {
        let mut state = fresh_state();
        let world = world();
        BattleEngine::new(&mut state)
            .execute(
                world.env(),
                &Transaction::new(
                    admin(),
                    BattleAction::SetBattlesEnabled(SetBattlesEnabledAction { enabled: false }),
                ),
            )
            .unwrap();
        let before = state.clone();

        let err = BattleEngine::new(&mut state)
            .execute(
                world.env(),
                &Transaction::new(owner(1), BattleAction::start_battle(TokenId(1), TokenId(2))),
            )
            .unwrap_err();

        assert!(matches!(
            &err,
            ExecuteError::StartBattle(e)
                if e.phase == TransitionPhase::PreValidate
                    && e.error == EncounterError::BattlesDisabled
        ));
        assert_eq!(err.error_code(), "BATTLES_DISABLED");
        assert_eq!(state, before);
    }

    #[test]
    fn full_encounter_commits_events_in_order() {
        let mut state = fresh_state();
        let world = world();
        let mut engine = BattleEngine::new(&mut state);

        let started = engine
            .execute(
                world.env(),
                &Transaction::new(owner(1), BattleAction::start_battle(TokenId(1), TokenId(2))),
            )
            .unwrap();
        assert!(matches!(
            started.events.first(),
            Some(BattleEvent::StatusChanged { .. })
        ));

        engine
            .execute(
                world.env(),
                &Transaction::new(
                    admin(),
                    BattleAction::FulfillRandomness(FulfillRandomnessAction::single(
                        EncounterId(1),
                        U256::from(12_345),
                    )),
                ),
            )
            .unwrap();

        // anyone may resolve
        let finished = engine
            .execute(
                world.env(),
                &Transaction::new(owner(9), BattleAction::finish_them(EncounterId(1))),
            )
            .unwrap();
        assert!(
            finished
                .events
                .iter()
                .any(|e| matches!(e, BattleEvent::BattleFinished { .. }))
        );

        let statuses = [state.record(TokenId(1)).status, state.record(TokenId(2)).status];
        assert!(
            statuses == [BattleStatus::Won, BattleStatus::Lost]
                || statuses == [BattleStatus::Lost, BattleStatus::Won]
        );
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn missing_chain_oracle_is_internal() {
        let mut state = fresh_state();
        let tx = Transaction::new(owner(1), BattleAction::finish_them(EncounterId(1)));
        let err = BattleEngine::new(&mut state)
            .execute(BattleEnv::empty(), &tx)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
