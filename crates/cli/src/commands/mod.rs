mod chance;
mod cycle;
mod inspect;
mod simulate;

pub use chance::Chance;
pub use cycle::Cycle;
pub use inspect::Inspect;
pub use simulate::Simulate;
