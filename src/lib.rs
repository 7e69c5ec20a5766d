//! Locker Layout - geometry and state engine for locker floor plans
//!
//! This library places rectangular lockers on a floor plan and a front
//! (elevation) view, checks them for collisions, stacks tiers, rotates and
//! moves selections, and keeps an undoable history of every change.
//!
//! # Example
//!
//! ```rust
//! use locker_layout::{LayoutConfig, LockerStore, LockerType, NewLocker};
//!
//! let mut store = LockerStore::new(LayoutConfig::default());
//! let small = LockerType::defaults().remove(0);
//! let locker = store.add(NewLocker::of_type(&small, "zone-1", 0.0, 0.0));
//! assert!(locker.id.is_temporary());
//! assert!(store.undo());
//! assert!(store.lockers().is_empty());
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod persistence;
pub mod store;

pub use error::{LockerError, Outcome};
pub use layout::{ConfigError, LayoutConfig, LintWarning};
pub use model::{
    Assignment, Locker, LockerId, LockerPatch, LockerStatus, LockerType, NewLocker, StatusCounts,
    ViewMode, Zone,
};
pub use persistence::{
    InMemoryRepository, JsonFileRepository, LockerRepository, PersistenceError, Scope,
};
pub use store::{LockerStore, StoreEvent};
