//! Error types for layout mutations

use std::fmt;

use thiserror::Error;

use crate::model::LockerId;
use crate::persistence::PersistenceError;

/// Errors that can occur while mutating the layout
#[derive(Debug, Error)]
pub enum LockerError {
    /// Update or delete on an id that is not in the collection
    #[error("locker '{id}' not found")]
    NotFound { id: LockerId },

    /// Tier stacking needs the parent's front-view position
    #[error("locker '{id}' has no front-view position; save parent position first")]
    MissingCoordinates { id: LockerId },

    /// Tier count outside the accepted range
    #[error("invalid tier count {count} (must be 1-{max})")]
    InvalidTierCount { count: u32, max: u32 },

    /// Delete refused while tiers remain
    #[error("cannot delete locker '{id}': {count} child lockers exist")]
    HasChildren { id: LockerId, count: usize },

    /// Requested tier levels run past the largest representable level
    #[error("tier levels starting at {base} on locker '{id}' are out of range")]
    TierLevelOverflow { id: LockerId, base: u32 },

    /// Group operation given no lockers
    #[error("selection is empty")]
    EmptySelection,

    /// Zone or type removal refused while lockers still reference it
    #[error("cannot remove {kind} '{id}': {count} lockers use it")]
    InUse {
        kind: &'static str,
        id: String,
        count: usize,
    },

    /// Update or removal of a zone or type that does not exist
    #[error("{kind} '{id}' not found")]
    UnknownEntry { kind: &'static str, id: String },

    /// Tiers can only be stacked on a top-level locker
    #[error("locker '{id}' is itself a tier of '{parent}'")]
    NotAParent { id: LockerId, parent: LockerId },

    /// Placement would overlap another locker in the same zone
    #[error("locker '{id}' would collide with '{other}'")]
    Collision { id: LockerId, other: LockerId },

    /// Non-finite rotation supplied to an update
    #[error("invalid rotation for locker '{id}', keeping {kept}")]
    InvalidRotation { id: LockerId, kept: f64 },

    /// Downstream persistence failure; local state is retained
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl LockerError {
    pub fn not_found(id: &LockerId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    pub fn collision(id: &LockerId, other: &LockerId) -> Self {
        Self::Collision {
            id: id.clone(),
            other: other.clone(),
        }
    }
}

/// User-facing result of a mutation: a success flag plus a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl<T> From<&Result<T, LockerError>> for Outcome {
    fn from(result: &Result<T, LockerError>) -> Self {
        match result {
            Ok(_) => Outcome::ok("ok"),
            Err(e) => Outcome::failed(e.to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.success { "ok" } else { "error" };
        write!(f, "{}: {}", tag, self.message)
    }
}
