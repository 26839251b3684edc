//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, U256};

use super::{
    BaseStats, BattleEnv, ChainOracle, EnergyOracle, Env, EquipmentOracle, ModifiedStats,
    StatOracle,
};
use crate::state::{Timestamp, TokenId};

#[derive(Default)]
pub struct World {
    pub owners: HashMap<TokenId, Address>,
    pub stats: HashMap<TokenId, BaseStats>,
    /// Flat (attack, defense, percent) bonus of the equipped item.
    pub items: HashMap<TokenId, (i64, i64, i64)>,
    pub consumables: HashSet<TokenId>,
    pub balances: HashMap<Address, u128>,
    pub now: Timestamp,
    pub prevrandao: U256,
}

impl World {
    pub fn at(now: Timestamp) -> Self {
        Self {
            now,
            prevrandao: U256::from(0xfeed_u64),
            ..Self::default()
        }
    }

    pub fn mint(&mut self, token: u64, owner: Address, attack: u32, defense: u32) -> TokenId {
        let token = TokenId(token);
        self.owners.insert(token, owner);
        self.stats.insert(token, BaseStats::new(attack, defense));
        token
    }

    pub fn equip(
        &mut self,
        token: TokenId,
        attack: i64,
        defense: i64,
        percent: i64,
        consumable: bool,
    ) {
        self.items.insert(token, (attack, defense, percent));
        if consumable {
            self.consumables.insert(token);
        }
    }

    pub fn env(&self) -> BattleEnv<'_> {
        Env::with_all(self, self, self, self).as_battle_env()
    }
}

impl StatOracle for World {
    fn owner_of(&self, token: TokenId) -> Option<Address> {
        self.owners.get(&token).copied()
    }

    fn base_stats(&self, token: TokenId) -> Option<BaseStats> {
        self.stats.get(&token).copied()
    }
}

impl EquipmentOracle for World {
    fn modified_stats(&self, token: TokenId) -> ModifiedStats {
        let base = self.stats.get(&token).copied().unwrap_or_default();
        let (attack, defense, percent) = self.items.get(&token).copied().unwrap_or_default();
        ModifiedStats::new(
            i64::from(base.attack) + attack,
            i64::from(base.defense) + defense,
            percent,
        )
    }

    fn has_consumable_equipped(&self, token: TokenId) -> bool {
        self.consumables.contains(&token)
    }
}

impl EnergyOracle for World {
    fn balance_of(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }
}

impl ChainOracle for World {
    fn timestamp(&self) -> Timestamp {
        self.now
    }

    fn prevrandao(&self) -> U256 {
        self.prevrandao
    }
}
