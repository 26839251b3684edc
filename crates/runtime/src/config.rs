//! Runtime configuration and environment loaders.
use std::env;
use std::path::PathBuf;

use battle_core::BattleConfig;

/// Configuration shared by the ledger, its worker and the event bus.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Capacity of the worker command channel.
    pub command_buffer_size: usize,
    /// Where to persist snapshots. In-memory only when `None`.
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            snapshot_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `UNIMON_CYCLE_DURATION` / `UNIMON_ADMIN_GRACE_PERIOD` /
    ///   `UNIMON_SPECIAL_ATTACK_DURATION` (seconds)
    /// - `UNIMON_MAX_REVIVES`
    /// - `UNIMON_MAX_BATCH_SIZE`
    /// - `UNIMON_EVENT_BUFFER`
    /// - `UNIMON_SNAPSHOT_DIR`
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seconds) = read_env::<u64>("UNIMON_CYCLE_DURATION") {
            config.battle.cycle_duration = seconds.max(1);
        }
        if let Some(seconds) = read_env::<u64>("UNIMON_ADMIN_GRACE_PERIOD") {
            config.battle.admin_grace_period = seconds;
        }
        if let Some(seconds) = read_env::<u64>("UNIMON_SPECIAL_ATTACK_DURATION") {
            config.battle.special_attack_duration = seconds;
        }
        if let Some(max) = read_env::<u32>("UNIMON_MAX_REVIVES") {
            config.battle.max_revives = max;
        }
        if let Some(max) = read_env::<u64>("UNIMON_MAX_BATCH_SIZE") {
            config.battle.max_batch_size = max.max(1);
        }
        if let Some(capacity) = read_env::<usize>("UNIMON_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(dir) = env::var_os("UNIMON_SNAPSHOT_DIR") {
            config.snapshot_dir = Some(PathBuf::from(dir));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
