//! Reference equipment contract.
//!
//! Items live in an ERC-1155 style balance table. Equipping moves one unit out
//! of the owner's balance into the token's single slot; unequipping returns it.
//! A consumable left in a slot is destroyed when the battle contract reports
//! that the wearer's encounter resolved.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use battle_core::{BaseStats, EquipmentOracle, ModifiedStats, StatOracle, TokenId};

use super::{ConsumableBurner, ContractError};

/// Modifiers granted by an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub attack_modifier: i64,
    pub defense_modifier: i64,
    /// Whole-percent bonus applied to the final win chance.
    pub overall_percent: i64,
    pub consumable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRegistry {
    admin: Address,
    /// Holder of the `consume_upon_battle` capability.
    consumer: Option<Address>,
    items: BTreeMap<u64, ItemConfig>,
    balances: BTreeMap<(Address, u64), u64>,
    equipped: BTreeMap<TokenId, u64>,
}

impl EquipmentRegistry {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            consumer: None,
            items: BTreeMap::new(),
            balances: BTreeMap::new(),
            equipped: BTreeMap::new(),
        }
    }

    pub fn set_consumer(
        &mut self,
        caller: Address,
        consumer: Address,
    ) -> Result<(), ContractError> {
        self.only_admin(caller)?;
        self.consumer = Some(consumer);
        Ok(())
    }

    pub fn register_item(
        &mut self,
        caller: Address,
        item: u64,
        config: ItemConfig,
    ) -> Result<(), ContractError> {
        self.only_admin(caller)?;
        if self.items.contains_key(&item) {
            return Err(ContractError::ItemExists(item));
        }
        self.items.insert(item, config);
        Ok(())
    }

    pub fn mint(
        &mut self,
        caller: Address,
        to: Address,
        item: u64,
        amount: u64,
    ) -> Result<(), ContractError> {
        self.only_admin(caller)?;
        if !self.items.contains_key(&item) {
            return Err(ContractError::UnknownItem(item));
        }
        let balance = self.balances.entry((to, item)).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    pub fn balance_of(&self, owner: Address, item: u64) -> u64 {
        self.balances.get(&(owner, item)).copied().unwrap_or_default()
    }

    pub fn item(&self, item: u64) -> Option<ItemConfig> {
        self.items.get(&item).copied()
    }

    /// Item currently in `token`'s slot.
    pub fn equipped(&self, token: TokenId) -> Option<(u64, ItemConfig)> {
        let item = *self.equipped.get(&token)?;
        self.item(item).map(|config| (item, config))
    }

    pub fn equip(
        &mut self,
        collection: &dyn StatOracle,
        caller: Address,
        token: TokenId,
        item: u64,
    ) -> Result<(), ContractError> {
        self.only_token_owner(collection, caller, token)?;
        if !self.items.contains_key(&item) {
            return Err(ContractError::UnknownItem(item));
        }
        if self.equipped.contains_key(&token) {
            return Err(ContractError::SlotOccupied(token));
        }
        let balance = self
            .balances
            .get_mut(&(caller, item))
            .filter(|balance| **balance > 0)
            .ok_or(ContractError::NoItemBalance {
                owner: caller,
                item,
            })?;
        *balance -= 1;
        self.equipped.insert(token, item);
        Ok(())
    }

    pub fn unequip(
        &mut self,
        collection: &dyn StatOracle,
        caller: Address,
        token: TokenId,
    ) -> Result<(), ContractError> {
        self.only_token_owner(collection, caller, token)?;
        let item = self
            .equipped
            .remove(&token)
            .ok_or(ContractError::SlotEmpty(token))?;
        *self.balances.entry((caller, item)).or_default() += 1;
        Ok(())
    }

    /// Base stats plus the flat modifiers of the equipped item.
    pub fn modified_stats(&self, base: BaseStats, token: TokenId) -> ModifiedStats {
        let config = self
            .equipped(token)
            .map(|(_, config)| config)
            .unwrap_or_default();
        ModifiedStats::new(
            i64::from(base.attack) + config.attack_modifier,
            i64::from(base.defense) + config.defense_modifier,
            config.overall_percent,
        )
    }

    pub fn has_consumable_equipped(&self, token: TokenId) -> bool {
        self.equipped(token)
            .is_some_and(|(_, config)| config.consumable)
    }

    fn only_admin(&self, caller: Address) -> Result<(), ContractError> {
        if caller == self.admin {
            Ok(())
        } else {
            Err(ContractError::NotContractOwner { caller })
        }
    }

    fn only_token_owner(
        &self,
        collection: &dyn StatOracle,
        caller: Address,
        token: TokenId,
    ) -> Result<(), ContractError> {
        match collection.owner_of(token) {
            Some(owner) if owner == caller => Ok(()),
            Some(_) => Err(ContractError::NotTokenOwner { token, caller }),
            None => Err(ContractError::UnknownToken(token)),
        }
    }
}

impl ConsumableBurner for EquipmentRegistry {
    fn consume_upon_battle(
        &mut self,
        caller: Address,
        token: TokenId,
    ) -> Result<(), ContractError> {
        if self.consumer != Some(caller) {
            return Err(ContractError::UnauthorizedCaller { caller });
        }
        if !self.has_consumable_equipped(token) {
            return Err(ContractError::NoConsumable(token));
        }
        // the unit left the owner's balance on equip; dropping the slot burns it
        self.equipped.remove(&token);
        Ok(())
    }
}

/// Equipment as seen by the battle rules: registry modifiers over collection
/// base stats.
pub struct EquipmentView<'a> {
    registry: &'a EquipmentRegistry,
    collection: &'a dyn StatOracle,
}

impl<'a> EquipmentView<'a> {
    pub fn new(registry: &'a EquipmentRegistry, collection: &'a dyn StatOracle) -> Self {
        Self {
            registry,
            collection,
        }
    }
}

impl EquipmentOracle for EquipmentView<'_> {
    fn modified_stats(&self, token: TokenId) -> ModifiedStats {
        let base = self.collection.base_stats(token).unwrap_or_default();
        self.registry.modified_stats(base, token)
    }

    fn has_consumable_equipped(&self, token: TokenId) -> bool {
        self.registry.has_consumable_equipped(token)
    }
}
