use super::Timestamp;

/// Administrative bookkeeping for a cycle.
///
/// Informational only: whether battles may happen is decided by the clock,
/// never by this record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleRecord {
    pub start_time: Timestamp,
    pub completed: bool,
}

impl CycleRecord {
    pub fn new(start_time: Timestamp) -> Self {
        Self {
            start_time,
            completed: false,
        }
    }
}
