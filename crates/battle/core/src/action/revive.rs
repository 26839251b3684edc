use crate::action::{
    BattleEvent, BattleTransition, CallContext, ExternalEffect, Permission, TransitionOutput,
};
use crate::env::{BattleEnv, OracleError};
use crate::error::{BattleError, ErrorKind};
use crate::state::{BattleState, BattleStatus, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReviveError {
    #[error("{token} is {status:?}, only FAINTED combatants can be revived")]
    NotFainted { token: TokenId, status: BattleStatus },

    #[error("{token} already revived {count} times")]
    ReviveLimitReached { token: TokenId, count: u32 },

    #[error("revive costs {required} energy, owner holds {available}")]
    InsufficientEnergy { required: u128, available: u128 },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for ReviveError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFainted { .. }
            | Self::ReviveLimitReached { .. }
            | Self::InsufficientEnergy { .. } => ErrorKind::StateConflict,
            Self::Oracle(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFainted { .. } => "NOT_FAINTED",
            Self::ReviveLimitReached { .. } => "REVIVE_LIMIT_REACHED",
            Self::InsufficientEnergy { .. } => "INSUFFICIENT_ENERGY",
            Self::Oracle(error) => error.error_code(),
        }
    }
}

/// `revive(tokenId)`: pays energy to bring a fainted combatant back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReviveAction {
    pub token: TokenId,
}

impl ReviveAction {
    pub fn new(token: TokenId) -> Self {
        Self { token }
    }

    fn cost(&self, state: &BattleState, env: &BattleEnv<'_>) -> Result<u128, OracleError> {
        let power = env.base_stats(self.token)?.total_power();
        Ok(state.config.revive_cost(power))
    }
}

impl BattleTransition for ReviveAction {
    type Error = ReviveError;

    fn permission(&self) -> Permission {
        Permission::TokenOwner(self.token)
    }

    fn pre_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        let record = state.record(self.token);
        if record.status != BattleStatus::Fainted {
            return Err(ReviveError::NotFainted {
                token: self.token,
                status: record.status,
            });
        }
        if record.revive_count >= state.config.max_revives {
            return Err(ReviveError::ReviveLimitReached {
                token: self.token,
                count: record.revive_count,
            });
        }

        let required = self.cost(state, env)?;
        let owner = env.owner_of(self.token)?;
        let available = env.energy()?.balance_of(owner);
        if available < required {
            return Err(ReviveError::InsufficientEnergy {
                required,
                available,
            });
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
        let cost = self.cost(state, env)?;
        let owner = env.owner_of(self.token)?;

        let record = state.record_mut(self.token);
        record.status = BattleStatus::Ready;
        record.revive_count += 1;
        let revive_count = record.revive_count;

        out.request(ExternalEffect::SpendEnergy {
            owner,
            amount: cost,
        });
        out.status_changed(self.token, BattleStatus::Fainted, BattleStatus::Ready);
        out.emit(BattleEvent::Revived {
            token: self.token,
            cost,
            revive_count,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;
    use crate::env::fixtures::World;
    use crate::state::test_support::{START, fresh_state};

    const UNIT: u128 = 1_000_000_000_000_000_000;

    fn setup(balance: u128) -> (BattleState, World, TokenId) {
        let mut state = fresh_state();
        let mut world = World::at(START + 60);
        let owner = Address::repeat_byte(1);
        let token = world.mint(1, owner, 2, 3);
        world.balances.insert(owner, balance);
        state.record_mut(token).status = BattleStatus::Fainted;
        (state, world, token)
    }

    fn run(
        state: &mut BattleState,
        world: &World,
        token: TokenId,
    ) -> Result<TransitionOutput, ReviveError> {
        let action = ReviveAction::new(token);
        let env = world.env();
        let ctx = CallContext {
            sender: Address::repeat_byte(1),
            now: world.now,
        };
        let mut out = TransitionOutput::default();
        action.pre_validate(&ctx, state, &env)?;
        action.apply(&ctx, state, &env, &mut out)?;
        Ok(out)
    }

    #[test]
    fn charges_half_power_rounded_up() {
        let (mut state, world, token) = setup(10 * UNIT);

        let out = run(&mut state, &world, token).unwrap();

        assert_eq!(
            out.effects,
            vec![ExternalEffect::SpendEnergy {
                owner: Address::repeat_byte(1),
                amount: 3 * UNIT,
            }]
        );
        let record = state.record(token);
        assert_eq!(record.status, BattleStatus::Ready);
        assert_eq!(record.revive_count, 1);
    }

    #[test]
    fn third_revive_fails() {
        let (mut state, world, token) = setup(100 * UNIT);
        for _ in 0..2 {
            run(&mut state, &world, token).unwrap();
            state.record_mut(token).status = BattleStatus::Fainted;
        }

        assert_eq!(
            run(&mut state, &world, token),
            Err(ReviveError::ReviveLimitReached { token, count: 2 })
        );
    }

    #[test]
    fn only_fainted_can_revive() {
        let (mut state, world, token) = setup(100 * UNIT);
        state.record_mut(token).status = BattleStatus::Dead;
        assert!(matches!(
            run(&mut state, &world, token),
            Err(ReviveError::NotFainted { .. })
        ));
    }

    #[test]
    fn rejects_short_balance() {
        let (mut state, world, token) = setup(3 * UNIT - 1);
        assert_eq!(
            run(&mut state, &world, token),
            Err(ReviveError::InsufficientEnergy {
                required: 3 * UNIT,
                available: 3 * UNIT - 1
            })
        );
        assert_eq!(state.record(token).status, BattleStatus::Fainted);
    }
}
