//! Persistence adapter consumed by the layout store
//!
//! The store mirrors its mutations into a [`LockerRepository`] after
//! applying them locally. Repositories hold no layout state of their own
//! beyond what they persist.

pub mod json_file;
pub mod memory;
pub mod wire;

pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;
pub use wire::{LockerRecord, StatusCode};

use thiserror::Error;

use crate::model::{Locker, LockerId};

/// Errors reported by a repository
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed layout data: {0}")]
    Json(#[from] serde_json::Error),

    /// The store refused the record (unknown id, bad field)
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("repository is offline")]
    Offline,
}

/// Company/branch/zone filter for loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub company: String,
    pub branch: String,
    pub zone: Option<String>,
    /// Restrict to top-level lockers
    pub parents_only: bool,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            company: "001".to_string(),
            branch: "001".to_string(),
            zone: None,
            parents_only: false,
        }
    }
}

impl Scope {
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn matches(&self, record: &LockerRecord) -> bool {
        record.comp_cd == self.company
            && record.bcoff_cd == self.branch
            && self.zone.as_ref().map_or(true, |z| *z == record.lockr_knd)
            && (!self.parents_only || record.parent_lockr_cd.is_none())
    }
}

/// Storage backend for lockers
pub trait LockerRepository {
    /// All lockers in scope, with assignment fields flattened in
    fn load_all(&self, scope: &Scope) -> Result<Vec<Locker>, PersistenceError>;

    /// Upsert by id. Temporary ids are inserted and receive a stored id,
    /// which the returned locker carries.
    fn save(&mut self, locker: &Locker) -> Result<Locker, PersistenceError>;

    fn delete(&mut self, id: &LockerId) -> Result<(), PersistenceError>;

    fn test_connection(&self) -> bool;
}
