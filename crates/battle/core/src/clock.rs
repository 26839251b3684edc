//! Cycle clock.
//!
//! Pure functions of wall-clock time and the immutable start timestamp. Cycle
//! numbering is 1-based once the start has passed; before that the clock
//! reports cycle 0 and every window is closed.
//!
//! ```text
//! |<-------------------------- cycle_duration -------------------------->|
//! |<- special ->|                                          |<-- grace -->|
//! |<--------------------- battle window --------------------->|          |
//! ```

use crate::config::BattleConfig;
use crate::state::Timestamp;

/// Inclusive total-power band allowed to attack during the special window.
///
/// `(0, 0)` before the first cycle, when special attacks are impossible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialAttackRange {
    pub min: u32,
    pub max: u32,
}

impl SpecialAttackRange {
    pub const CLOSED: Self = Self { min: 0, max: 0 };

    pub fn contains(&self, power: u32) -> bool {
        self.max > 0 && (self.min..=self.max).contains(&power)
    }
}

/// Snapshot of the clock at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleInfo {
    pub cycle_number: u64,
    pub cycle_start: Timestamp,
    pub cycle_end: Timestamp,
    pub battle_window_open: bool,
    pub special_window_open: bool,
    pub special_range: SpecialAttackRange,
}

/// Clock over a start timestamp and the windows in [`BattleConfig`].
#[derive(Clone, Copy, Debug)]
pub struct CycleClock<'a> {
    start: Timestamp,
    config: &'a BattleConfig,
}

impl<'a> CycleClock<'a> {
    pub fn new(start: Timestamp, config: &'a BattleConfig) -> Self {
        Self { start, config }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn has_started(&self, now: Timestamp) -> bool {
        now >= self.start
    }

    /// Seconds elapsed into the current cycle, or `None` before the start.
    fn elapsed_in_cycle(&self, now: Timestamp) -> Option<u64> {
        now.checked_sub(self.start)
            .map(|elapsed| elapsed % self.config.cycle_duration)
    }

    /// `0` before the start, else `floor((now - start) / cycle) + 1`.
    pub fn current_cycle_number(&self, now: Timestamp) -> u64 {
        match now.checked_sub(self.start) {
            Some(elapsed) => elapsed / self.config.cycle_duration + 1,
            None => 0,
        }
    }

    /// Start of cycle `number`. Cycle 0 is treated as beginning at the start.
    pub fn cycle_start(&self, number: u64) -> Timestamp {
        let index = number.saturating_sub(1);
        self.start
            .saturating_add(index.saturating_mul(self.config.cycle_duration))
    }

    /// True outside the trailing admin grace period of a started cycle.
    pub fn is_within_battle_window(&self, now: Timestamp) -> bool {
        let open_for = self.config.cycle_duration - self.config.admin_grace_period;
        self.elapsed_in_cycle(now)
            .is_some_and(|elapsed| elapsed <= open_for)
    }

    /// True during the leading special-attack window of a started cycle.
    pub fn is_within_special_attack_period(&self, now: Timestamp) -> bool {
        self.elapsed_in_cycle(now)
            .is_some_and(|elapsed| elapsed <= self.config.special_attack_duration)
    }

    /// Power band for special attacks: widens by `special_level_step` per
    /// cycle until it reaches `special_level_cap`.
    pub fn special_attack_level_range(&self, now: Timestamp) -> SpecialAttackRange {
        let cycle = self.current_cycle_number(now);
        if cycle == 0 {
            return SpecialAttackRange::CLOSED;
        }

        let step = u64::from(self.config.special_level_step);
        let cap = u64::from(self.config.special_level_cap);
        let max = cycle.saturating_mul(step).min(cap);
        SpecialAttackRange {
            min: 1,
            // bounded by `special_level_cap: u32`
            max: u32::try_from(max).unwrap_or(self.config.special_level_cap),
        }
    }

    pub fn cycle_info(&self, now: Timestamp) -> CycleInfo {
        let cycle_number = self.current_cycle_number(now);
        let cycle_start = self.cycle_start(cycle_number);
        CycleInfo {
            cycle_number,
            cycle_start,
            cycle_end: cycle_start.saturating_add(self.config.cycle_duration),
            battle_window_open: self.is_within_battle_window(now),
            special_window_open: self.is_within_special_attack_period(now),
            special_range: self.special_attack_level_range(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Timestamp = 1_000_000;
    const HOUR: u64 = 3_600;
    const DAY: u64 = 24 * HOUR;

    fn with_clock(check: impl FnOnce(CycleClock<'_>)) {
        let config = BattleConfig::default();
        check(CycleClock::new(START, &config));
    }

    #[test]
    fn cycle_zero_before_start() {
        with_clock(|clock| {
            assert_eq!(clock.current_cycle_number(START - 1), 0);
            assert!(!clock.is_within_battle_window(START - 1));
            assert!(!clock.is_within_special_attack_period(START - 1));
            assert_eq!(
                clock.special_attack_level_range(START - 1),
                SpecialAttackRange::CLOSED
            );
        });
    }

    #[test]
    fn cycles_are_one_based() {
        with_clock(|clock| {
            assert_eq!(clock.current_cycle_number(START), 1);
            assert_eq!(clock.current_cycle_number(START + DAY - 1), 1);
            assert_eq!(clock.current_cycle_number(START + DAY), 2);
            assert_eq!(clock.cycle_start(2), START + DAY);
        });
    }

    #[test]
    fn grace_period_closes_battle_window() {
        with_clock(|clock| {
            assert!(clock.is_within_battle_window(START));
            // boundary is inclusive
            assert!(clock.is_within_battle_window(START + DAY - HOUR));
            assert!(!clock.is_within_battle_window(START + DAY - HOUR + 1));
            assert!(!clock.is_within_battle_window(START + DAY - 1));
            assert!(clock.is_within_battle_window(START + DAY));
        });
    }

    #[test]
    fn special_window_is_first_half_hour() {
        with_clock(|clock| {
            assert!(clock.is_within_special_attack_period(START));
            assert!(clock.is_within_special_attack_period(START + 30 * 60));
            assert!(!clock.is_within_special_attack_period(START + 30 * 60 + 1));
            assert!(clock.is_within_special_attack_period(START + DAY + 60));
        });
    }

    #[test]
    fn special_range_widens_then_caps() {
        with_clock(|clock| {
            let at_cycle = |n: u64| clock.special_attack_level_range(START + (n - 1) * DAY);
            assert_eq!(at_cycle(1), SpecialAttackRange { min: 1, max: 2 });
            assert_eq!(at_cycle(2), SpecialAttackRange { min: 1, max: 4 });
            assert_eq!(at_cycle(9), SpecialAttackRange { min: 1, max: 18 });
            assert_eq!(at_cycle(10), SpecialAttackRange { min: 1, max: 20 });
            assert_eq!(at_cycle(250), SpecialAttackRange { min: 1, max: 20 });
        });
    }

    #[test]
    fn cycle_info_reports_bounds() {
        with_clock(|clock| {
            let info = clock.cycle_info(START + DAY + 10);
            assert_eq!(info.cycle_number, 2);
            assert_eq!(info.cycle_start, START + DAY);
            assert_eq!(info.cycle_end, START + 2 * DAY);
            assert!(info.battle_window_open);
            assert!(info.special_window_open);
            assert!(info.special_range.contains(4));
            assert!(!info.special_range.contains(5));
        });
    }
}
