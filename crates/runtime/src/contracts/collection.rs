//! Reference Unimon NFT collection.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use battle_core::{BaseStats, BattleConfig, StatOracle, TokenId};

use super::ContractError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unimon {
    pub owner: Address,
    pub stats: BaseStats,
}

/// Owner table plus the attack and defense levels of every minted token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnimonCollection {
    admin: Address,
    tokens: BTreeMap<TokenId, Unimon>,
}

impl UnimonCollection {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            tokens: BTreeMap::new(),
        }
    }

    pub fn mint(
        &mut self,
        caller: Address,
        token: TokenId,
        to: Address,
        stats: BaseStats,
    ) -> Result<(), ContractError> {
        self.only_admin(caller)?;
        check_level(stats.attack)?;
        check_level(stats.defense)?;
        if self.tokens.contains_key(&token) {
            return Err(ContractError::AlreadyMinted(token));
        }
        self.tokens.insert(token, Unimon { owner: to, stats });
        Ok(())
    }

    pub fn transfer(
        &mut self,
        caller: Address,
        token: TokenId,
        to: Address,
    ) -> Result<(), ContractError> {
        let unimon = self
            .tokens
            .get_mut(&token)
            .ok_or(ContractError::UnknownToken(token))?;
        if unimon.owner != caller {
            return Err(ContractError::NotTokenOwner { token, caller });
        }
        unimon.owner = to;
        Ok(())
    }

    /// Evolution hook: rewrites both levels of an existing token.
    pub fn set_levels(
        &mut self,
        caller: Address,
        token: TokenId,
        stats: BaseStats,
    ) -> Result<(), ContractError> {
        self.only_admin(caller)?;
        check_level(stats.attack)?;
        check_level(stats.defense)?;
        let unimon = self
            .tokens
            .get_mut(&token)
            .ok_or(ContractError::UnknownToken(token))?;
        unimon.stats = stats;
        Ok(())
    }

    pub fn total_supply(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> impl Iterator<Item = (&TokenId, &Unimon)> {
        self.tokens.iter()
    }

    fn only_admin(&self, caller: Address) -> Result<(), ContractError> {
        if caller == self.admin {
            Ok(())
        } else {
            Err(ContractError::NotContractOwner { caller })
        }
    }
}

fn check_level(level: u32) -> Result<(), ContractError> {
    if (1..=BattleConfig::MAX_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(ContractError::InvalidLevel {
            level,
            max: BattleConfig::MAX_LEVEL,
        })
    }
}

impl StatOracle for UnimonCollection {
    fn owner_of(&self, token: TokenId) -> Option<Address> {
        self.tokens.get(&token).map(|unimon| unimon.owner)
    }

    fn base_stats(&self, token: TokenId) -> Option<BaseStats> {
        self.tokens.get(&token).map(|unimon| unimon.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Address {
        Address::repeat_byte(0xad)
    }

    #[test]
    fn levels_are_bounded() {
        let mut collection = UnimonCollection::new(admin());
        let owner = Address::repeat_byte(1);
        assert_eq!(
            collection.mint(admin(), TokenId(1), owner, BaseStats::new(0, 1)),
            Err(ContractError::InvalidLevel { level: 0, max: 10 })
        );
        collection
            .mint(admin(), TokenId(1), owner, BaseStats::new(10, 10))
            .unwrap();
        assert_eq!(
            collection.set_levels(admin(), TokenId(1), BaseStats::new(11, 1)),
            Err(ContractError::InvalidLevel { level: 11, max: 10 })
        );
    }

    #[test]
    fn transfer_moves_ownership() {
        let mut collection = UnimonCollection::new(admin());
        let alice = Address::repeat_byte(1);
        let bob = Address::repeat_byte(2);
        collection
            .mint(admin(), TokenId(7), alice, BaseStats::new(1, 1))
            .unwrap();

        assert!(matches!(
            collection.transfer(bob, TokenId(7), bob),
            Err(ContractError::NotTokenOwner { .. })
        ));
        collection.transfer(alice, TokenId(7), bob).unwrap();
        assert_eq!(collection.owner_of(TokenId(7)), Some(bob));
        assert!(!collection.exists(TokenId(8)));
    }

    #[test]
    fn only_admin_mints() {
        let mut collection = UnimonCollection::new(admin());
        let alice = Address::repeat_byte(1);
        assert_eq!(
            collection.mint(alice, TokenId(1), alice, BaseStats::new(1, 1)),
            Err(ContractError::NotContractOwner { caller: alice })
        );
    }
}
