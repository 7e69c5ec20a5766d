//! Change notifications emitted by the store

use crate::model::LockerId;

/// What changed in the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Added(LockerId),
    Updated(LockerId),
    Deleted(LockerId),
    /// The collection was replaced from history
    Restored { undo: bool },
    /// The collection was replaced from the repository
    Loaded { count: usize },
    /// A locker was mirrored to the repository; `replaced` is the temporary
    /// id it carried before its first save
    Persisted {
        id: LockerId,
        replaced: Option<LockerId>,
    },
    /// Mirroring failed; the local change stands
    PersistenceFailed { id: LockerId, message: String },
}

pub type Observer = Box<dyn FnMut(&StoreEvent)>;
