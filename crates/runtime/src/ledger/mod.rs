//! Single-writer ledger hosting the battle contract and its collaborators.
//!
//! Every [`Ledger::submit`] is one atomic transaction: the battle engine runs
//! against staged copies, requested collaborator writes are routed through
//! the capability ports, and only when all of that succeeds are the copies
//! swapped in. Any failure leaves every contract exactly as it was.
//!
//! With a repository attached, the staged ledger is saved before it is
//! adopted, so a failed save reverts like any other failure. Direct contract
//! writes and clock moves follow the same rule.

mod block;
mod receipt;
mod snapshot;

use std::sync::Arc;

use alloy_primitives::{Address, U256, keccak256};
use tracing::{debug, info, warn};

use battle_core::{
    BattleEngine, BattleState, CombatantRecord, CycleInfo, Encounter, EncounterId, Env,
    EquipmentOracle, ExecutionOutcome, ExternalEffect, ModifiedStats, SpecialAttackRange,
    StatOracle, Timestamp, TokenId, Transaction,
};

pub use block::BlockContext;
pub use receipt::TxReceipt;
pub use snapshot::LedgerSnapshot;

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::contracts::{
    ConsumableBurner, ContractError, EnergySpender, EnergyToken, EquipmentRegistry,
    EquipmentView, UnimonCollection,
};
use crate::events::{CommittedEvent, Event, EventBus, RevertedTx};
use crate::repository::{FileStateRepository, StateRepository};

pub struct Ledger {
    deployer: Address,
    battle_address: Address,
    block: BlockContext,
    state: BattleState,
    collection: UnimonCollection,
    equipment: EquipmentRegistry,
    energy: EnergyToken,
    event_bus: EventBus,
    repository: Option<Arc<dyn StateRepository>>,
}

impl Ledger {
    /// Deploys all four contracts at `genesis` with the battle clock starting
    /// at `start_timestamp`.
    ///
    /// `deployer` administers every contract. The battle contract is granted
    /// the consume and spend capabilities on the equipment and energy
    /// contracts.
    pub fn deploy(
        config: &RuntimeConfig,
        deployer: Address,
        genesis: Timestamp,
        start_timestamp: Timestamp,
    ) -> Result<Self> {
        let state = BattleState::new(config.battle.clone(), start_timestamp, genesis, deployer)
            .map_err(RuntimeError::InitialState)?;
        let battle_address = battle_contract_address(deployer);

        let mut equipment = EquipmentRegistry::new(deployer);
        equipment.set_consumer(deployer, battle_address)?;
        let mut energy = EnergyToken::new(deployer);
        energy.set_spender(deployer, battle_address)?;

        let seed = U256::from_be_bytes(keccak256(deployer.as_slice()).0);
        info!(
            %deployer,
            %battle_address,
            start_timestamp,
            "deployed battle contracts"
        );

        Ok(Self {
            deployer,
            battle_address,
            block: BlockContext::genesis(genesis, seed),
            state,
            collection: UnimonCollection::new(deployer),
            equipment,
            energy,
            event_bus: EventBus::with_capacity(config.event_buffer_size),
            repository: None,
        })
    }

    /// Resumes from the latest snapshot under `config.snapshot_dir`, or
    /// deploys fresh when there is none. Every later write is persisted
    /// there before it takes effect.
    pub fn open(
        config: &RuntimeConfig,
        deployer: Address,
        genesis: Timestamp,
        start_timestamp: Timestamp,
    ) -> Result<Self> {
        let Some(dir) = &config.snapshot_dir else {
            return Self::deploy(config, deployer, genesis, start_timestamp);
        };
        let repository: Arc<dyn StateRepository> = Arc::new(FileStateRepository::new(dir)?);
        let ledger = match repository.latest()? {
            Some(snapshot) => {
                Self::from_snapshot(snapshot, EventBus::with_capacity(config.event_buffer_size))
            }
            None => Self::deploy(config, deployer, genesis, start_timestamp)?,
        };
        Ok(ledger.with_repository(repository))
    }

    /// Resumes a ledger from a stored snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot, event_bus: EventBus) -> Self {
        info!(block = snapshot.block.number, "restored ledger from snapshot");
        Self {
            deployer: snapshot.deployer,
            battle_address: snapshot.battle_address,
            block: snapshot.block,
            state: snapshot.state,
            collection: snapshot.collection,
            equipment: snapshot.equipment,
            energy: snapshot.energy,
            event_bus,
            repository: None,
        }
    }

    /// Saves a snapshot before every write is adopted, keyed by the block
    /// number the snapshot carries.
    pub fn with_repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            deployer: self.deployer,
            battle_address: self.battle_address,
            block: self.block,
            state: self.state.clone(),
            collection: self.collection.clone(),
            equipment: self.equipment.clone(),
            energy: self.energy.clone(),
        }
    }

    // ===== accessors =====

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn battle_address(&self) -> Address {
        self.battle_address
    }

    pub fn block(&self) -> &BlockContext {
        &self.block
    }

    pub fn now(&self) -> Timestamp {
        self.block.timestamp
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn collection(&self) -> &UnimonCollection {
        &self.collection
    }

    pub fn equipment(&self) -> &EquipmentRegistry {
        &self.equipment
    }

    pub fn energy(&self) -> &EnergyToken {
        &self.energy
    }

    /// Writes to the collaborator contracts outside the battle contract:
    /// mints, item registration, grants, equips.
    ///
    /// `f` runs against staged copies. They replace the live contracts only
    /// when `f` succeeds and the resulting snapshot is saved.
    pub fn update_contracts<T>(
        &mut self,
        f: impl FnOnce(&mut ContractSet) -> std::result::Result<T, ContractError>,
    ) -> Result<T> {
        let mut staged = ContractSet {
            collection: self.collection.clone(),
            equipment: self.equipment.clone(),
            energy: self.energy.clone(),
        };
        let value = f(&mut staged)?;

        self.commit(LedgerSnapshot {
            deployer: self.deployer,
            battle_address: self.battle_address,
            block: self.block,
            state: self.state.clone(),
            collection: staged.collection,
            equipment: staged.equipment,
            energy: staged.energy,
        })?;
        Ok(value)
    }

    /// Equips `item` on `token`, as its owner.
    pub fn equip(&mut self, caller: Address, token: TokenId, item: u64) -> Result<()> {
        self.update_contracts(|contracts| contracts.equip(caller, token, item))
    }

    pub fn unequip(&mut self, caller: Address, token: TokenId) -> Result<()> {
        self.update_contracts(|contracts| contracts.unequip(caller, token))
    }

    // ===== time control =====

    pub fn advance_time(&mut self, seconds: u64) -> Result<Timestamp> {
        let block = BlockContext {
            timestamp: self.block.timestamp.saturating_add(seconds),
            ..self.block
        };
        self.move_block(block)?;
        Ok(block.timestamp)
    }

    /// Moves the clock to `timestamp`. Time never runs backwards.
    pub fn set_timestamp(&mut self, timestamp: Timestamp) -> Result<()> {
        if timestamp < self.block.timestamp {
            return Err(RuntimeError::TimeTravel {
                requested: timestamp,
                current: self.block.timestamp,
            });
        }
        self.move_block(BlockContext {
            timestamp,
            ..self.block
        })
    }

    /// Seals the current block without a transaction.
    pub fn mine_block(&mut self) -> Result<()> {
        self.move_block(self.block.next())
    }

    // ===== transactions =====

    /// Executes `tx` atomically in the current block, then seals the block.
    pub fn submit(&mut self, tx: Transaction) -> Result<TxReceipt> {
        let block_number = self.block.number;
        let action = tx.action.name();

        match self.try_submit(&tx) {
            Ok(receipt) => {
                info!(
                    target: "runtime::ledger",
                    block = block_number,
                    action,
                    sender = %tx.sender,
                    events = receipt.events.len(),
                    "transaction committed"
                );
                if !receipt.skipped.is_empty() {
                    debug!(action, skipped = ?receipt.skipped, "batch entries skipped");
                }
                self.publish(&receipt);
                Ok(receipt)
            }
            Err(error) => {
                let error_code = error.error_code().unwrap_or("INTERNAL");
                warn!(
                    target: "runtime::ledger",
                    block = block_number,
                    action,
                    sender = %tx.sender,
                    code = error_code,
                    "transaction reverted: {error}"
                );
                self.event_bus.publish(Event::Reverted(RevertedTx {
                    block_number,
                    action: action.to_string(),
                    error_code: error_code.to_string(),
                    reason: error.to_string(),
                }));
                Err(error)
            }
        }
    }

    fn try_submit(&mut self, tx: &Transaction) -> Result<TxReceipt> {
        let (state, equipment, energy, outcome) = self.execute(tx)?;
        let receipt = TxReceipt {
            block_number: self.block.number,
            timestamp: self.block.timestamp,
            state_root: state.state_root(),
            events: outcome.events,
            effects: outcome.effects,
            skipped: outcome.skipped,
        };

        self.commit(LedgerSnapshot {
            deployer: self.deployer,
            battle_address: self.battle_address,
            block: self.block.next(),
            state,
            collection: self.collection.clone(),
            equipment,
            energy,
        })?;
        Ok(receipt)
    }

    /// Runs the engine and routes effects on staged copies.
    fn execute(
        &self,
        tx: &Transaction,
    ) -> Result<(BattleState, EquipmentRegistry, EnergyToken, ExecutionOutcome)> {
        let mut state = self.state.clone();
        let outcome = {
            let equipment_view = EquipmentView::new(&self.equipment, &self.collection);
            let env = Env::with_all(
                &self.collection,
                &equipment_view,
                &self.energy,
                &self.block,
            );
            BattleEngine::new(&mut state).execute(env.as_battle_env(), tx)?
        };

        let mut equipment = self.equipment.clone();
        let mut energy = self.energy.clone();
        route_effects(
            self.battle_address,
            &mut equipment,
            &mut energy,
            &outcome.effects,
        )?;

        Ok((state, equipment, energy, outcome))
    }

    fn publish(&self, receipt: &TxReceipt) {
        for event in &receipt.events {
            self.event_bus.publish(Event::Committed(CommittedEvent {
                block_number: receipt.block_number,
                timestamp: receipt.timestamp,
                event: event.clone(),
            }));
        }
    }

    /// Saves `next` under its block number, then adopts it.
    fn commit(&mut self, next: LedgerSnapshot) -> Result<()> {
        if let Some(repository) = &self.repository {
            repository.save(next.block.number, &next)?;
        }
        self.block = next.block;
        self.state = next.state;
        self.collection = next.collection;
        self.equipment = next.equipment;
        self.energy = next.energy;
        Ok(())
    }

    fn move_block(&mut self, block: BlockContext) -> Result<()> {
        if let Some(repository) = &self.repository {
            let mut snapshot = self.snapshot();
            snapshot.block = block;
            repository.save(block.number, &snapshot)?;
        }
        self.block = block;
        Ok(())
    }

    // ===== read API =====

    pub fn cycle_info(&self) -> CycleInfo {
        self.state.clock().cycle_info(self.now())
    }

    pub fn current_cycle_number(&self) -> u64 {
        self.state.clock().current_cycle_number(self.now())
    }

    pub fn is_within_battle_window(&self) -> bool {
        self.state.clock().is_within_battle_window(self.now())
    }

    pub fn is_within_special_attack_period(&self) -> bool {
        self.state.clock().is_within_special_attack_period(self.now())
    }

    pub fn special_attack_level_range(&self) -> SpecialAttackRange {
        self.state.clock().special_attack_level_range(self.now())
    }

    pub fn battle_record(&self, token: TokenId) -> CombatantRecord {
        self.state.record(token)
    }

    pub fn battle_records(&self, tokens: &[TokenId]) -> Vec<CombatantRecord> {
        self.state.records(tokens)
    }

    pub fn encounter(&self, id: EncounterId) -> Option<&Encounter> {
        self.state.encounter(id)
    }

    /// Base attack plus defense, or `None` for unknown tokens.
    pub fn total_power(&self, token: TokenId) -> Option<u32> {
        self.collection
            .base_stats(token)
            .map(|stats| stats.total_power())
    }

    pub fn modified_stats(&self, token: TokenId) -> ModifiedStats {
        EquipmentView::new(&self.equipment, &self.collection).modified_stats(token)
    }

    /// Encounters waiting on the randomness provider.
    pub fn pending_encounters(&self) -> Vec<EncounterId> {
        self.state
            .encounters()
            .filter(|encounter| !encounter.resolved && encounter.is_pending())
            .map(|encounter| encounter.id)
            .collect()
    }

    /// Fulfilled encounters anyone may resolve.
    pub fn resolvable_encounters(&self) -> Vec<EncounterId> {
        self.state
            .encounters()
            .filter(|encounter| encounter.is_resolvable())
            .map(|encounter| encounter.id)
            .collect()
    }
}

/// Staged collaborator contracts handed to [`Ledger::update_contracts`].
pub struct ContractSet {
    pub collection: UnimonCollection,
    pub equipment: EquipmentRegistry,
    pub energy: EnergyToken,
}

impl ContractSet {
    pub fn equip(
        &mut self,
        caller: Address,
        token: TokenId,
        item: u64,
    ) -> std::result::Result<(), ContractError> {
        self.equipment.equip(&self.collection, caller, token, item)
    }

    pub fn unequip(
        &mut self,
        caller: Address,
        token: TokenId,
    ) -> std::result::Result<(), ContractError> {
        self.equipment.unequip(&self.collection, caller, token)
    }
}

/// Applies requested collaborator writes in order, as the battle contract.
fn route_effects(
    battle_address: Address,
    burner: &mut dyn ConsumableBurner,
    spender: &mut dyn EnergySpender,
    effects: &[ExternalEffect],
) -> std::result::Result<(), ContractError> {
    for effect in effects {
        debug!(?effect, "routing collaborator write");
        match *effect {
            ExternalEffect::BurnConsumable { token } => {
                burner.consume_upon_battle(battle_address, token)?;
            }
            ExternalEffect::SpendEnergy { owner, amount } => {
                spender.spend(battle_address, owner, amount)?;
            }
        }
    }
    Ok(())
}

fn battle_contract_address(deployer: Address) -> Address {
    let mut preimage = deployer.to_vec();
    preimage.extend_from_slice(b"UnimonBattles");
    Address::from_word(keccak256(preimage))
}

