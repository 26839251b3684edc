//! Winner selection for resolved encounters.
mod chance;
mod result;

pub use chance::{BPS_DENOMINATOR, MAX_CHANCE_BPS, MIN_CHANCE_BPS, win_chance_bps};
pub use result::{Resolution, Side, roll_bps, select_winner};
