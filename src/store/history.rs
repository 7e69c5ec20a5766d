//! Undo/redo history over full snapshots of the locker collection.
//!
//! The snapshot at the cursor always equals the live collection. Recording
//! drops any redo tail, appends the new state, and evicts the oldest entry
//! once the cap is exceeded, shifting the cursor so it still points at the
//! current state.

use crate::model::{Locker, LockerId};

#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Locker>>,
    cursor: usize,
    limit: usize,
}

impl History {
    pub fn new(initial: &[Locker], limit: usize) -> Self {
        Self {
            snapshots: vec![initial.to_vec()],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Discard all entries and start over from `state`
    pub fn reset(&mut self, state: &[Locker]) {
        self.snapshots = vec![state.to_vec()];
        self.cursor = 0;
    }

    /// Record `state` as the new current entry
    pub fn record(&mut self, state: &[Locker]) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state.to_vec());
        self.cursor = self.snapshots.len() - 1;

        while self.snapshots.len() > self.limit {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back, returning the state to restore
    pub fn undo(&mut self) -> Option<&[Locker]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward, returning the state to restore
    pub fn redo(&mut self) -> Option<&[Locker]> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewrite a temporary id to its persisted id in every snapshot
    pub fn remap_id(&mut self, from: &LockerId, to: &LockerId) {
        for locker in self.snapshots.iter_mut().flatten() {
            if locker.id == *from {
                locker.id = to.clone();
            }
            if locker.parent_id.as_ref() == Some(from) {
                locker.parent_id = Some(to.clone());
            }
        }
    }

    /// Overwrite `locker`'s entry in the current snapshot only
    pub fn replace_current(&mut self, locker: &Locker) {
        let Some(current) = self.snapshots.get_mut(self.cursor) else {
            return;
        };
        if let Some(entry) = current.iter_mut().find(|l| l.id == locker.id) {
            *entry = locker.clone();
        }
    }
}
