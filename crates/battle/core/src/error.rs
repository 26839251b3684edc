//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. `EncounterError`, `ReviveError`) are defined
//! next to the transitions they validate. This module provides the shared
//! classification every one of them implements so callers can tell an
//! authorization failure from a state conflict without matching on variants.

/// Broad category of a rejected transaction.
///
/// - **Unauthorized**: the sender lacks the role or ownership required
/// - **Precondition**: the request is malformed or arrives outside its window
/// - **StateConflict**: the request is well-formed but the current state forbids it
/// - **Internal**: a state inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    Unauthorized,
    Precondition,
    StateConflict,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Precondition => "precondition",
            Self::StateConflict => "state_conflict",
            Self::Internal => "internal",
        }
    }

    /// Returns true if retrying later (without changing the request) may succeed.
    ///
    /// Window and state-conflict failures clear up as time passes or as other
    /// transactions land; authorization and internal failures do not.
    pub const fn may_succeed_later(&self) -> bool {
        matches!(self, Self::Precondition | Self::StateConflict)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - `error_code` must be stable: front-ends branch on it
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the category of this error.
    fn kind(&self) -> ErrorKind;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
