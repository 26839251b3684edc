//! Reference energy token used to pay for revivals.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use battle_core::EnergyOracle;

use super::{ContractError, EnergySpender};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyToken {
    admin: Address,
    /// Holder of the `spend` capability.
    spender: Option<Address>,
    balances: BTreeMap<Address, u128>,
}

impl EnergyToken {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            spender: None,
            balances: BTreeMap::new(),
        }
    }

    pub fn set_spender(&mut self, caller: Address, spender: Address) -> Result<(), ContractError> {
        if caller != self.admin {
            return Err(ContractError::NotContractOwner { caller });
        }
        self.spender = Some(spender);
        Ok(())
    }

    pub fn mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), ContractError> {
        if caller != self.admin {
            return Err(ContractError::NotContractOwner { caller });
        }
        let balance = self.balances.entry(to).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    pub fn total_supply(&self) -> u128 {
        self.balances.values().sum()
    }
}

impl EnergyOracle for EnergyToken {
    fn balance_of(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }
}

impl EnergySpender for EnergyToken {
    fn spend(
        &mut self,
        caller: Address,
        owner: Address,
        amount: u128,
    ) -> Result<(), ContractError> {
        if self.spender != Some(caller) {
            return Err(ContractError::UnauthorizedCaller { caller });
        }
        let available = self.balance_of(owner);
        if available < amount {
            return Err(ContractError::InsufficientBalance {
                owner,
                required: amount,
                available,
            });
        }
        self.balances.insert(owner, available - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_requires_grant_and_balance() {
        let admin = Address::repeat_byte(0xad);
        let battle = Address::repeat_byte(0xba);
        let alice = Address::repeat_byte(1);
        let mut energy = EnergyToken::new(admin);
        energy.mint(admin, alice, 5).unwrap();

        assert_eq!(
            energy.spend(battle, alice, 1),
            Err(ContractError::UnauthorizedCaller { caller: battle })
        );

        energy.set_spender(admin, battle).unwrap();
        assert_eq!(
            energy.spend(battle, alice, 6),
            Err(ContractError::InsufficientBalance {
                owner: alice,
                required: 6,
                available: 5
            })
        );
        energy.spend(battle, alice, 5).unwrap();
        assert_eq!(energy.balance_of(alice), 0);
    }
}
