//! Win-chance calculator.

use anyhow::Result;
use clap::Parser;

use battle_core::combat::BPS_DENOMINATOR;
use battle_core::{ModifiedStats, win_chance_bps};

/// Print the clamped attacker win chance
#[derive(Parser)]
pub struct Chance {
    /// Attacker's modified attack
    #[arg(long, allow_negative_numbers = true)]
    attack: i64,

    /// Defender's modified defense
    #[arg(long, allow_negative_numbers = true)]
    defense: i64,

    /// Attacker's overall bonus in whole percent
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    attacker_percent: i64,

    /// Defender's overall bonus in whole percent
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    defender_percent: i64,
}

impl Chance {
    pub fn execute(self) -> Result<()> {
        let attacker = ModifiedStats::new(self.attack, 0, self.attacker_percent);
        let defender = ModifiedStats::new(0, self.defense, self.defender_percent);
        let bps = win_chance_bps(attacker, defender);

        println!(
            "attacker wins {bps} / {BPS_DENOMINATOR} ({:.2}%)",
            f64::from(bps) / 100.0
        );
        Ok(())
    }
}
