//! Cycle clock inspection.

use anyhow::{Result, bail};
use clap::Parser;

use battle_core::CycleClock;
use runtime::RuntimeConfig;

/// Print the cycle clock at a given instant
///
/// Window lengths come from the `UNIMON_*` environment variables.
#[derive(Parser)]
pub struct Cycle {
    /// First cycle start (unix seconds)
    #[arg(long)]
    start: u64,

    /// Instant to evaluate (unix seconds)
    #[arg(long)]
    now: u64,

    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl Cycle {
    pub fn execute(self) -> Result<()> {
        let config = RuntimeConfig::from_env().battle;
        if config.cycle_duration == 0 {
            bail!("cycle duration must be non-zero");
        }
        let info = CycleClock::new(self.start, &config).cycle_info(self.now);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(());
        }

        if info.cycle_number == 0 {
            println!("battles have not started (first cycle at {})", self.start);
            return Ok(());
        }
        println!("cycle          {}", info.cycle_number);
        println!("window         {} .. {}", info.cycle_start, info.cycle_end);
        println!("battle window  {}", open_or_closed(info.battle_window_open));
        println!("special window {}", open_or_closed(info.special_window_open));
        println!(
            "special range  {}..={}",
            info.special_range.min, info.special_range.max
        );
        Ok(())
    }
}

fn open_or_closed(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}
