//! Read and inspect persisted ledger snapshots
//!
//! Loads `block_{n}.bin` files written by the file repository and displays
//! their contents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use runtime::{FileStateRepository, StateRepository};

/// Read a persisted ledger snapshot
#[derive(Parser)]
pub struct Inspect {
    /// Snapshot directory (defaults to `UNIMON_SNAPSHOT_DIR`)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Block to read. If not provided, uses the latest snapshot
    #[arg(short, long, value_name = "BLOCK")]
    block: Option<u64>,

    /// Print the block context and battle state as JSON
    #[arg(long)]
    json: bool,
}

impl Inspect {
    pub fn execute(self) -> Result<()> {
        let dir = match self.dir {
            Some(dir) => dir,
            None => std::env::var_os("UNIMON_SNAPSHOT_DIR")
                .map(PathBuf::from)
                .context("pass --dir or set UNIMON_SNAPSHOT_DIR")?,
        };
        let repository = FileStateRepository::new(&dir)
            .with_context(|| format!("Failed to open {}", dir.display()))?;

        let snapshot = match self.block {
            Some(block) => repository.load(block)?,
            None => repository.latest()?,
        }
        .with_context(|| format!("No snapshot found in {}", dir.display()))?;

        if self.json {
            let view = serde_json::json!({
                "block": snapshot.block,
                "battle_address": snapshot.battle_address,
                "state": snapshot.state,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        let state = &snapshot.state;
        let mut statuses: BTreeMap<&'static str, usize> = BTreeMap::new();
        for (_, record) in state.stored_records() {
            *statuses.entry(record.status.as_str()).or_default() += 1;
        }
        let open = state.encounters().filter(|e| !e.resolved).count();

        println!("block          {}", snapshot.block.number);
        println!("timestamp      {}", snapshot.block.timestamp);
        println!("battle address {}", snapshot.battle_address);
        println!("state root     0x{}", hex::encode(state.state_root()));
        println!("battles        {}", if state.battles_enabled { "enabled" } else { "disabled" });
        println!("tokens         {}", snapshot.collection.total_supply());
        println!("encounters     {} ({open} open)", state.encounter_count());
        for (status, count) in statuses {
            println!("  {status:<10} {count}");
        }
        Ok(())
    }
}

