//! Seeded multi-cycle battle simulation.
//!
//! Deploys an in-process ledger, mints a population, and for every cycle
//! runs random pairings during the battle window, provider fulfilment,
//! resolution, the grace-period sweep and revivals, all through a
//! [`LedgerHandle`].

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use battle_core::action::{
    AdvanceStatusesAction, CompleteCycleAction, FulfillRandomnessAction, ForceResolveAction,
    GrantRandomnessRoleAction,
};
use battle_core::{
    Address, BaseStats, BattleAction, BattleConfig, BattleEvent, BattleStatus, EncounterId,
    ExternalEffect, Side, StatOracle, TokenId, Transaction, U256,
};
use runtime::{
    FileStateRepository, ItemConfig, Ledger, LedgerHandle, RuntimeConfig, StateRepository,
    TxReceipt,
};

/// Run a seeded multi-cycle simulation
#[derive(Parser)]
pub struct Simulate {
    /// Number of combatants to mint
    #[arg(long, default_value_t = 16)]
    combatants: u64,

    /// Number of cycles to run
    #[arg(long, default_value_t = 3)]
    cycles: u64,

    /// Seed for pairings, stats and provider randomness
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Share of encounters the provider leaves for the admin sweep, in percent
    #[arg(long, default_value_t = 10)]
    unfulfilled_percent: u8,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    combatants: u64,
    cycles: u64,
    encounters: u64,
    attacker_wins: u64,
    force_resolved: u64,
    fallback_randomness: u64,
    consumables_burned: u64,
    revives: u64,
    reverted: u64,
    final_block: u64,
    state_root: String,
    statuses: BTreeMap<&'static str, u64>,
}

impl Summary {
    fn record(&mut self, receipt: &TxReceipt) {
        for event in &receipt.events {
            match event {
                BattleEvent::BattleStarted { .. } => self.encounters += 1,
                BattleEvent::BattleFinished { resolution, .. }
                    if resolution.winning_side == Side::Attacker =>
                {
                    self.attacker_wins += 1
                }
                BattleEvent::EncounterForceResolved { .. } => self.force_resolved += 1,
                BattleEvent::RandomnessFulfilled { fallback: true, .. } => {
                    self.fallback_randomness += 1
                }
                BattleEvent::Revived { .. } => self.revives += 1,
                _ => {}
            }
        }
        self.consumables_burned += receipt
            .effects
            .iter()
            .filter(|effect| matches!(effect, ExternalEffect::BurnConsumable { .. }))
            .count() as u64;
    }
}

/// Item id of the consumable handed to part of the population.
const POTION: u64 = 1;

struct Actors {
    deployer: Address,
    provider: Address,
}

impl Simulate {
    pub async fn execute(self) -> Result<()> {
        let config = RuntimeConfig::from_env();
        let battle = config.battle.clone();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let actors = Actors {
            deployer: player(u64::MAX),
            provider: player(u64::MAX - 1),
        };
        let genesis = 1;
        let start = battle.cycle_duration;

        let mut ledger = Ledger::deploy(&config, actors.deployer, genesis, start)
            .context("failed to deploy ledger")?;
        if let Some(dir) = &config.snapshot_dir {
            let repository = FileStateRepository::new(dir)?;
            for block in repository.list_blocks()? {
                repository.delete(block)?;
            }
            info!(dir = %dir.display(), "persisting snapshots");
            ledger = ledger.with_repository(std::sync::Arc::new(repository));
        }
        populate(&mut ledger, &actors, self.combatants, &mut rng)?;

        let (handle, task) = LedgerHandle::spawn(ledger, &config);

        let mut summary = Summary {
            seed: self.seed,
            combatants: self.combatants,
            cycles: self.cycles,
            ..Summary::default()
        };

        submit(
            &handle,
            &mut summary,
            actors.deployer,
            BattleAction::GrantRandomnessRole(GrantRandomnessRoleAction {
                accounts: vec![actors.provider],
            }),
        )
        .await;

        for cycle in 1..=self.cycles {
            let cycle_start = start + (cycle - 1) * battle.cycle_duration;
            info!(cycle, "simulating cycle");
            self.run_cycle(&handle, &actors, &battle, cycle, cycle_start, &mut rng, &mut summary)
                .await?;
        }

        let ledger = handle.shutdown(task).await?;
        summary.final_block = ledger.block().number;
        summary.state_root = format!("0x{}", hex::encode(ledger.state().state_root()));
        for token in 1..=self.combatants {
            let status = ledger.battle_record(TokenId(token)).status;
            *summary.statuses.entry(status.as_str()).or_default() += 1;
        }

        print_summary(&summary, self.json)
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_cycle(
        &self,
        handle: &LedgerHandle,
        actors: &Actors,
        battle: &BattleConfig,
        cycle: u64,
        cycle_start: u64,
        rng: &mut StdRng,
        summary: &mut Summary,
    ) -> Result<()> {
        // battle window, past the special-attack period
        handle
            .set_timestamp(cycle_start + battle.special_attack_duration + 1)
            .await?;
        let snapshot = handle.snapshot().await?;
        let first_encounter = snapshot.state.next_encounter_id();

        let mut ready: Vec<TokenId> = (1..=self.combatants)
            .map(TokenId)
            .filter(|token| snapshot.state.record(*token).is_ready())
            .collect();
        ready.shuffle(rng);
        for pair in ready.chunks_exact(2) {
            let (attacker, defender) = (pair[0], pair[1]);
            let Some(owner) = snapshot.collection.owner_of(attacker) else {
                continue;
            };
            submit(
                handle,
                summary,
                owner,
                BattleAction::start_battle(attacker, defender),
            )
            .await;
        }

        let snapshot = handle.snapshot().await?;
        let opened: Vec<EncounterId> = snapshot
            .state
            .encounters()
            .filter(|encounter| encounter.id >= first_encounter && encounter.is_pending())
            .map(|encounter| encounter.id)
            .collect();
        let fulfilled: Vec<EncounterId> = opened
            .iter()
            .copied()
            .filter(|_| rng.gen_range(0..100) >= self.unfulfilled_percent)
            .collect();
        for chunk in fulfilled.chunks(battle.max_batch_size.max(1) as usize) {
            let seeds = chunk.iter().map(|_| U256::from(rng.r#gen::<u64>())).collect();
            submit(
                handle,
                summary,
                actors.provider,
                BattleAction::FulfillRandomness(FulfillRandomnessAction::new(
                    chunk.to_vec(),
                    seeds,
                )),
            )
            .await;
        }
        for encounter in &fulfilled {
            submit(
                handle,
                summary,
                actors.deployer,
                BattleAction::finish_them(*encounter),
            )
            .await;
        }

        // admin grace period
        handle
            .set_timestamp(cycle_start + battle.cycle_duration - battle.admin_grace_period + 1)
            .await?;
        let last_encounter = handle.snapshot().await?.state.next_encounter_id();
        for (start, end) in batches(first_encounter.0, last_encounter.0, battle.max_batch_size) {
            submit(
                handle,
                summary,
                actors.deployer,
                BattleAction::ForceResolve(ForceResolveAction::new(
                    EncounterId(start),
                    EncounterId(end),
                )),
            )
            .await;
        }
        for (start, end) in batches(1, self.combatants + 1, battle.max_batch_size) {
            submit(
                handle,
                summary,
                actors.deployer,
                BattleAction::AdvanceStatuses(AdvanceStatusesAction::new(
                    TokenId(start),
                    TokenId(end),
                )),
            )
            .await;
        }
        submit(
            handle,
            summary,
            actors.deployer,
            BattleAction::CompleteCycle(CompleteCycleAction { cycle }),
        )
        .await;

        let snapshot = handle.snapshot().await?;
        for token in (1..=self.combatants).map(TokenId) {
            let record = snapshot.state.record(token);
            if record.status != BattleStatus::Fainted || record.revive_count >= battle.max_revives {
                continue;
            }
            let Some(owner) = snapshot.collection.owner_of(token) else {
                continue;
            };
            submit(handle, summary, owner, BattleAction::revive(token)).await;
        }
        Ok(())
    }
}

/// Mints tokens with random levels, hands out energy and equips potions on
/// roughly a quarter of the population.
fn populate(ledger: &mut Ledger, actors: &Actors, combatants: u64, rng: &mut StdRng) -> Result<()> {
    let deployer = actors.deployer;
    let energy_unit = ledger.state().config.revive_cost_unit;

    ledger.update_contracts(|contracts| {
        contracts.equipment.register_item(
            deployer,
            POTION,
            ItemConfig {
                attack_modifier: 1,
                defense_modifier: 1,
                overall_percent: 10,
                consumable: true,
            },
        )?;

        for id in 1..=combatants {
            let token = TokenId(id);
            let owner = player(id);
            let stats = BaseStats::new(
                rng.gen_range(1..=BattleConfig::MAX_LEVEL),
                rng.gen_range(1..=BattleConfig::MAX_LEVEL),
            );
            contracts.collection.mint(deployer, token, owner, stats)?;

            let energy = rng.gen_range(0..=8) * energy_unit;
            contracts.energy.mint(deployer, owner, energy)?;

            if rng.gen_ratio(1, 4) {
                contracts.equipment.mint(deployer, owner, POTION, 1)?;
                contracts.equip(owner, token, POTION)?;
            }
        }
        Ok(())
    })?;
    debug!(combatants, "population minted");
    Ok(())
}

/// Submits one transaction. Reverts are part of the simulation and only
/// counted.
async fn submit(
    handle: &LedgerHandle,
    summary: &mut Summary,
    sender: Address,
    action: BattleAction,
) {
    match handle.submit(Transaction::new(sender, action)).await {
        Ok(receipt) => summary.record(&receipt),
        Err(error) => {
            debug!(code = error.error_code().unwrap_or("INTERNAL"), "{error}");
            summary.reverted += 1;
        }
    }
}

/// Splits `[start, end)` into inclusive ranges accepted by batch admin calls.
fn batches(start: u64, end: u64, max: u64) -> Vec<(u64, u64)> {
    let max = max.max(1);
    let mut ranges = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let last = (cursor + max - 1).min(end - 1);
        ranges.push((cursor, last));
        cursor = last + 1;
    }
    ranges
}

fn player(index: u64) -> Address {
    Address::from_word(U256::from(index).to_be_bytes::<32>().into())
}

fn print_summary(summary: &Summary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "{} combatants over {} cycles (seed {})",
        summary.combatants, summary.cycles, summary.seed
    );
    println!(
        "encounters {}  attacker wins {}  force-resolved {} ({} fallback)",
        summary.encounters,
        summary.attacker_wins,
        summary.force_resolved,
        summary.fallback_randomness
    );
    println!(
        "consumables burned {}  revives {}  reverted {}",
        summary.consumables_burned, summary.revives, summary.reverted
    );
    println!("final block {}  state root {}", summary.final_block, summary.state_root);
    for (status, count) in &summary.statuses {
        println!("  {status:<10} {count}");
    }
    Ok(())
}
