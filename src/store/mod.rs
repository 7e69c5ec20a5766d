//! Authoritative in-memory layout state.
//!
//! [`LockerStore`] owns the locker collection, zones, and locker types. Every
//! mutation is applied locally first, recorded in the undo history, and
//! announced to observers; only then is it mirrored to the repository.
//! A repository failure is logged and reported as an event but never
//! reverts the local change.

pub mod events;
pub mod history;

pub use events::{Observer, StoreEvent};
pub use history::History;

use tracing::{debug, info, warn};

use crate::error::LockerError;
use crate::layout::collision::{find_collision, Candidate};
use crate::layout::group::{move_group, RotationGesture};
use crate::layout::snap::{snap_to_grid, snap_to_neighbors, SnapResult};
use crate::layout::tiers::{plan_tiers, TierRequest};
use crate::layout::types::Rect;
use crate::layout::LayoutConfig;
use crate::model::{
    Locker, LockerId, LockerPatch, LockerType, NewLocker, StatusCounts, ViewMode, Zone,
};
use crate::persistence::{LockerRepository, PersistenceError, Scope};

pub struct LockerStore {
    config: LayoutConfig,
    lockers: Vec<Locker>,
    zones: Vec<Zone>,
    types: Vec<LockerType>,
    history: History,
    repository: Option<Box<dyn LockerRepository>>,
    scope: Scope,
    online: bool,
    next_temp: u64,
    next_zone: u64,
    observers: Vec<Observer>,
}

impl Default for LockerStore {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LockerStore {
    /// An offline store with the default type catalog
    pub fn new(config: LayoutConfig) -> Self {
        let history = History::new(&[], config.history_limit);
        Self {
            config,
            lockers: Vec::new(),
            zones: Vec::new(),
            types: LockerType::defaults(),
            history,
            repository: None,
            scope: Scope::default(),
            online: false,
            next_temp: 0,
            next_zone: 0,
            observers: Vec::new(),
        }
    }

    /// A store mirroring its changes into `repository`
    pub fn with_repository(config: LayoutConfig, repository: Box<dyn LockerRepository>) -> Self {
        let mut store = Self::new(config);
        store.repository = Some(repository);
        store.online = true;
        store
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Register a callback for every [`StoreEvent`]
    pub fn subscribe(&mut self, observer: impl FnMut(&StoreEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: StoreEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    // ---- queries ----

    pub fn lockers(&self) -> &[Locker] {
        &self.lockers
    }

    pub fn get(&self, id: &LockerId) -> Option<&Locker> {
        self.lockers.iter().find(|l| l.id == *id)
    }

    fn index_of(&self, id: &LockerId) -> Result<usize, LockerError> {
        self.lockers
            .iter()
            .position(|l| l.id == *id)
            .ok_or_else(|| LockerError::not_found(id))
    }

    /// Tiers of `parent`, lowest level first
    pub fn children_of(&self, parent: &LockerId) -> Vec<&Locker> {
        let mut children: Vec<&Locker> = self
            .lockers
            .iter()
            .filter(|l| l.parent_id.as_ref() == Some(parent))
            .collect();
        children.sort_by_key(|l| l.tier_level);
        children
    }

    /// Lockers shown on `floor`; lockers without a floor show on every floor
    pub fn lockers_on_floor(&self, floor: u32) -> impl Iterator<Item = &Locker> + '_ {
        self.lockers.iter().filter(move |l| l.is_on_floor(floor))
    }

    pub fn lockers_in_zone<'a>(&'a self, zone_id: &'a str) -> impl Iterator<Item = &'a Locker> + 'a {
        self.lockers.iter().filter(move |l| l.zone_id == zone_id)
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.lockers)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    // ---- zones and types ----

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn set_zones(&mut self, zones: Vec<Zone>) {
        self.zones = zones;
    }

    /// Create a zone with a generated `zone-<n>` id
    pub fn add_zone(
        &mut self,
        name: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Option<String>,
    ) -> Zone {
        self.next_zone += 1;
        let zone = Zone {
            id: format!("zone-{}", self.next_zone),
            name: name.into(),
            x,
            y,
            width,
            height,
            color,
        };
        self.zones.push(zone.clone());
        zone
    }

    /// Replace the zone with the same id
    pub fn update_zone(&mut self, zone: Zone) -> Result<(), LockerError> {
        let existing = self
            .zones
            .iter_mut()
            .find(|z| z.id == zone.id)
            .ok_or_else(|| LockerError::UnknownEntry {
                kind: "zone",
                id: zone.id.clone(),
            })?;
        debug!(zone = %zone.id, "updated zone");
        *existing = zone;
        Ok(())
    }

    /// Remove a zone that no locker is assigned to
    pub fn remove_zone(&mut self, id: &str) -> Result<Zone, LockerError> {
        let index = self
            .zones
            .iter()
            .position(|z| z.id == id)
            .ok_or_else(|| LockerError::UnknownEntry {
                kind: "zone",
                id: id.to_string(),
            })?;
        let count = self.lockers_in_zone(id).count();
        if count > 0 {
            return Err(LockerError::InUse {
                kind: "zone",
                id: id.to_string(),
                count,
            });
        }
        debug!(zone = %id, "removed zone");
        Ok(self.zones.remove(index))
    }

    pub fn types(&self) -> &[LockerType] {
        &self.types
    }

    pub fn locker_type(&self, id: &str) -> Option<&LockerType> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Add a type, replacing any registered type with the same id
    pub fn register_type(&mut self, locker_type: LockerType) {
        match self.types.iter_mut().find(|t| t.id == locker_type.id) {
            Some(existing) => *existing = locker_type,
            None => self.types.push(locker_type),
        }
    }

    pub fn set_types(&mut self, types: Vec<LockerType>) {
        self.types = types;
    }

    /// Remove a type that no locker uses
    pub fn remove_type(&mut self, id: &str) -> Result<LockerType, LockerError> {
        let index = self
            .types
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LockerError::UnknownEntry {
                kind: "type",
                id: id.to_string(),
            })?;
        let count = self.lockers.iter().filter(|l| l.type_id == id).count();
        if count > 0 {
            return Err(LockerError::InUse {
                kind: "type",
                id: id.to_string(),
                count,
            });
        }
        debug!(type_id = %id, "removed locker type");
        Ok(self.types.remove(index))
    }

    // ---- mutations ----

    fn next_temp_id(&mut self) -> LockerId {
        self.next_temp += 1;
        LockerId::temporary(self.next_temp)
    }

    /// Append a locker with a temporary id and mirror it.
    ///
    /// Returns the locker as stored after persistence, which carries the
    /// persisted id when the save succeeded.
    pub fn add(&mut self, new: NewLocker) -> Locker {
        let id = self.next_temp_id();
        self.insert(new.into_locker(id))
    }

    fn insert(&mut self, locker: Locker) -> Locker {
        let id = locker.id.clone();
        debug!(id = %id, rotation = locker.rotation, "added locker");
        self.lockers.push(locker);
        let index = self.lockers.len() - 1;
        self.history.record(&self.lockers);
        self.emit(StoreEvent::Added(id.clone()));

        self.persist_new(&id);
        self.lockers[index].clone()
    }

    /// Like [`add`](Self::add), but refuse positions that collide in the zone
    pub fn place(&mut self, new: NewLocker) -> Result<Locker, LockerError> {
        let id = self.next_temp_id();
        let locker = new.into_locker(id);
        for view in [ViewMode::Floor, ViewMode::Front] {
            self.ensure_clear(&locker, view, self.config.minimum_gap, &[])?;
        }
        Ok(self.insert(locker))
    }

    /// Shallow-merge `patch` onto a locker.
    ///
    /// A non-finite rotation is replaced with the locker's previous rotation.
    pub fn update(&mut self, id: &LockerId, patch: LockerPatch) -> Result<Locker, LockerError> {
        let index = self.index_of(id)?;
        let mut patch = patch;

        if let Some(rotation) = patch.rotation {
            if !rotation.is_finite() {
                let previous = self.lockers[index].rotation;
                let kept = if previous.is_finite() { previous } else { 0.0 };
                let recovered = LockerError::InvalidRotation {
                    id: id.clone(),
                    kept,
                };
                warn!("{}", recovered);
                patch.rotation = Some(kept);
            }
        }

        patch.apply_to(&mut self.lockers[index]);
        debug!(id = %id, "updated locker");
        self.history.record(&self.lockers);
        self.emit(StoreEvent::Updated(id.clone()));

        if !id.is_temporary() {
            self.persist_existing(index);
        }
        Ok(self.lockers[index].clone())
    }

    /// Move a locker, refusing positions that collide in its zone
    pub fn move_to(
        &mut self,
        id: &LockerId,
        view: ViewMode,
        x: f64,
        y: f64,
    ) -> Result<Locker, LockerError> {
        let index = self.index_of(id)?;
        let mut moved = self.lockers[index].clone();
        moved.set_position(view, x, y);
        self.ensure_clear(&moved, view, self.config.minimum_gap, &[])?;
        self.update(id, LockerPatch::position(view, x, y))
    }

    /// Where a locker dragged to `(x, y)` would land.
    ///
    /// Each axis snaps to a neighbor edge in the same zone when one is within
    /// `snap_threshold`, otherwise to the grid. Nothing is changed.
    pub fn snap_position(
        &self,
        id: &LockerId,
        view: ViewMode,
        x: f64,
        y: f64,
    ) -> Result<SnapResult, LockerError> {
        let locker = self.get(id).ok_or_else(|| LockerError::not_found(id))?;
        let rect = Rect::new(x, y, locker.width, locker.height).with_rotation(locker.rotation);
        let neighbors: Vec<Rect> = self
            .lockers
            .iter()
            .filter(|l| l.id != *id && l.zone_id == locker.zone_id)
            .filter_map(|l| l.rect(view))
            .collect();

        let mut result = snap_to_neighbors(&rect, &neighbors, &self.config);
        if result.snapped_x.is_none() {
            result.x = snap_to_grid(x, self.config.grid_size);
        }
        if result.snapped_y.is_none() {
            result.y = snap_to_grid(y, self.config.grid_size);
        }
        Ok(result)
    }

    /// Remove a locker that has no tiers
    pub fn delete(&mut self, id: &LockerId) -> Result<Locker, LockerError> {
        let index = self.index_of(id)?;
        let children = self.children_of(id).len();
        if children > 0 {
            return Err(LockerError::HasChildren {
                id: id.clone(),
                count: children,
            });
        }

        let removed = self.lockers.remove(index);
        debug!(id = %id, "deleted locker");
        self.history.record(&self.lockers);
        self.emit(StoreEvent::Deleted(id.clone()));

        if !id.is_temporary() {
            self.persist_delete(id);
        }
        Ok(removed)
    }

    /// Restore the previous snapshot. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(state) => {
                self.lockers = state.to_vec();
                self.emit(StoreEvent::Restored { undo: true });
                true
            }
            None => false,
        }
    }

    /// Re-apply the next snapshot. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(state) => {
                self.lockers = state.to_vec();
                self.emit(StoreEvent::Restored { undo: false });
                true
            }
            None => false,
        }
    }

    // ---- tiers ----

    /// Height used for tiers stacked on a locker of `type_id`
    pub fn tier_height_for(&self, type_id: &str) -> f64 {
        self.locker_type(type_id)
            .map(|t| t.height)
            .unwrap_or(self.config.default_tier_height)
    }

    /// Stack `tier_count` tiers above `parent_id` in the front view.
    ///
    /// Existing tiers at the requested levels are replaced. The whole
    /// operation is one undo step.
    pub fn add_tiers(
        &mut self,
        parent_id: &LockerId,
        tier_count: u32,
        base_tier_level: Option<u32>,
    ) -> Result<Vec<Locker>, LockerError> {
        let parent = self
            .get(parent_id)
            .ok_or_else(|| LockerError::not_found(parent_id))?;
        let request = TierRequest {
            tier_count,
            base_tier_level,
            tier_height: self.tier_height_for(&parent.type_id),
            gap: self.config.tier_gap,
            scale: self.config.visual_scale,
            max_tiers: self.config.max_tiers,
        };
        let plan = plan_tiers(parent, &self.children_of(parent_id), &request)?;

        for replaced in &plan.replaced {
            self.lockers.retain(|l| l.id != *replaced);
        }
        let mut created = Vec::with_capacity(plan.tiers.len());
        for tier in plan.tiers {
            let id = self.next_temp_id();
            self.lockers.push(tier.into_locker(id.clone()));
            created.push(id);
        }
        info!(
            parent = %parent_id,
            added = created.len(),
            replaced = plan.replaced.len(),
            "stacked tiers"
        );
        self.history.record(&self.lockers);

        for replaced in &plan.replaced {
            self.emit(StoreEvent::Deleted(replaced.clone()));
            if !replaced.is_temporary() {
                self.persist_delete(replaced);
            }
        }
        for id in &created {
            self.emit(StoreEvent::Added(id.clone()));
        }

        let mut tiers = Vec::with_capacity(created.len());
        for id in created {
            let id = self.persist_new(&id);
            if let Some(locker) = self.get(&id) {
                tiers.push(locker.clone());
            }
        }
        Ok(tiers)
    }

    // ---- group transforms ----

    fn selection(&self, ids: &[LockerId]) -> Result<Vec<Locker>, LockerError> {
        ids.iter()
            .map(|id| self.get(id).cloned().ok_or_else(|| LockerError::not_found(id)))
            .collect()
    }

    /// Fix the pivot for a rotation gesture over `ids`
    pub fn begin_rotation(
        &self,
        ids: &[LockerId],
        view: ViewMode,
    ) -> Result<RotationGesture, LockerError> {
        let Some(first) = ids.first() else {
            return Err(LockerError::EmptySelection);
        };
        let selection = self.selection(ids)?;
        RotationGesture::begin(&selection, view, None)
            .ok_or_else(|| LockerError::MissingCoordinates { id: first.clone() })
    }

    /// Validate the gesture at `total_delta` without changing anything
    pub fn preview_rotation(
        &self,
        gesture: &RotationGesture,
        total_delta: f64,
    ) -> Result<Vec<Locker>, LockerError> {
        let ids: Vec<LockerId> = gesture.member_ids().cloned().collect();
        let rotated = gesture.apply(&self.selection(&ids)?, total_delta);
        self.validate_group(&rotated, gesture.view(), self.config.rotation_tolerance)?;
        Ok(rotated)
    }

    /// Apply the gesture at `total_delta` as one undo step
    pub fn commit_rotation(
        &mut self,
        gesture: &RotationGesture,
        total_delta: f64,
    ) -> Result<Vec<Locker>, LockerError> {
        let rotated = self.preview_rotation(gesture, total_delta)?;
        self.commit_group(rotated)
    }

    /// Rotate a selection about its center in one step
    pub fn rotate_selection(
        &mut self,
        ids: &[LockerId],
        delta_degrees: f64,
        view: ViewMode,
    ) -> Result<Vec<Locker>, LockerError> {
        let gesture = self.begin_rotation(ids, view)?;
        self.commit_rotation(&gesture, delta_degrees)
    }

    /// Translate a selection, refusing collisions with unselected lockers
    pub fn move_selection(
        &mut self,
        ids: &[LockerId],
        dx: f64,
        dy: f64,
        view: ViewMode,
    ) -> Result<Vec<Locker>, LockerError> {
        let moved = move_group(&self.selection(ids)?, dx, dy, view);
        self.validate_group(&moved, view, self.config.minimum_gap)?;
        self.commit_group(moved)
    }

    fn validate_group(
        &self,
        members: &[Locker],
        view: ViewMode,
        tolerance: f64,
    ) -> Result<(), LockerError> {
        let member_ids: Vec<LockerId> = members.iter().map(|m| m.id.clone()).collect();
        for member in members {
            self.ensure_clear(member, view, tolerance, &member_ids)?;
        }
        Ok(())
    }

    /// Fail if `locker` collides with any locker outside `ignore`
    fn ensure_clear(
        &self,
        locker: &Locker,
        view: ViewMode,
        tolerance: f64,
        ignore: &[LockerId],
    ) -> Result<(), LockerError> {
        let Some(candidate) = Candidate::of(locker, view) else {
            return Ok(());
        };
        let others = self.lockers.iter().filter(|l| !ignore.contains(&l.id));
        match find_collision(&candidate, others, &locker.zone_id, tolerance, view) {
            Some(other) => Err(LockerError::collision(&locker.id, &other.id)),
            None => Ok(()),
        }
    }

    fn commit_group(&mut self, members: Vec<Locker>) -> Result<Vec<Locker>, LockerError> {
        let mut indices = Vec::with_capacity(members.len());
        for member in &members {
            indices.push(self.index_of(&member.id)?);
        }
        for (index, member) in indices.iter().zip(&members) {
            self.lockers[*index] = member.clone();
        }
        debug!(count = members.len(), "transformed selection");
        self.history.record(&self.lockers);

        for (index, member) in indices.iter().zip(&members) {
            self.emit(StoreEvent::Updated(member.id.clone()));
            if !member.id.is_temporary() {
                self.persist_existing(*index);
            }
        }
        Ok(members)
    }

    // ---- persistence ----

    /// Replace the collection from the repository and reset history.
    ///
    /// An empty result keeps the local collection. Returns the number of
    /// lockers loaded.
    pub fn load(&mut self) -> Result<usize, LockerError> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(LockerError::Persistence(PersistenceError::Offline))?;
        let lockers = repository.load_all(&self.scope)?;
        let count = lockers.len();
        if count > 0 {
            self.lockers = lockers;
            self.history.reset(&self.lockers);
            info!(count, "loaded lockers");
        } else {
            info!("repository holds no lockers; keeping local collection");
        }
        self.emit(StoreEvent::Loaded { count });
        Ok(count)
    }

    /// Switch between mirroring to the repository and local-only editing.
    ///
    /// Going online tests the connection and reloads; on failure the store
    /// stays offline and `false` is returned.
    pub fn set_online(&mut self, enabled: bool) -> bool {
        if !enabled {
            self.online = false;
            info!("switched to offline mode");
            return true;
        }

        let connected = self
            .repository
            .as_ref()
            .map(|r| r.test_connection())
            .unwrap_or(false);
        if !connected {
            warn!("cannot connect to repository; staying offline");
            self.online = false;
            return false;
        }

        self.online = true;
        match self.load() {
            Ok(_) => true,
            Err(e) => {
                warn!("reload after reconnect failed: {}", e);
                true
            }
        }
    }

    /// Save every locker. Returns how many saves succeeded.
    pub fn sync_all(&mut self) -> Result<usize, LockerError> {
        if !self.online || self.repository.is_none() {
            return Err(PersistenceError::Offline.into());
        }
        let ids: Vec<LockerId> = self.lockers.iter().map(|l| l.id.clone()).collect();
        let mut saved = 0;
        for id in ids {
            let ok = if id.is_temporary() {
                !self.persist_new(&id).is_temporary()
            } else {
                match self.index_of(&id) {
                    Ok(index) => self.persist_existing(index),
                    Err(_) => false,
                }
            };
            if ok {
                saved += 1;
            }
        }
        info!(saved, total = self.lockers.len(), "synced lockers");
        Ok(saved)
    }

    fn repository_mut(&mut self) -> Option<&mut Box<dyn LockerRepository>> {
        if self.online {
            self.repository.as_mut()
        } else {
            None
        }
    }

    fn report_failure(&mut self, id: &LockerId, error: PersistenceError) {
        warn!(id = %id, "persistence failed, keeping local copy: {}", error);
        self.emit(StoreEvent::PersistenceFailed {
            id: id.clone(),
            message: error.to_string(),
        });
    }

    /// First save of a temporary locker. Returns the id it ends up with.
    fn persist_new(&mut self, temp: &LockerId) -> LockerId {
        let Ok(index) = self.index_of(temp) else {
            return temp.clone();
        };
        let snapshot = self.lockers[index].clone();
        let Some(repository) = self.repository_mut() else {
            return temp.clone();
        };

        match repository.save(&snapshot) {
            Ok(saved) => {
                let id = saved.id.clone();
                self.lockers[index] = saved;
                self.remap_id(temp, &id);
                self.history.replace_current(&self.lockers[index]);
                info!(temp = %temp, id = %id, "locker saved");
                self.emit(StoreEvent::Persisted {
                    id: id.clone(),
                    replaced: Some(temp.clone()),
                });
                id
            }
            Err(e) => {
                self.report_failure(temp, e);
                temp.clone()
            }
        }
    }

    fn persist_existing(&mut self, index: usize) -> bool {
        let snapshot = self.lockers[index].clone();
        let Some(repository) = self.repository_mut() else {
            return false;
        };
        match repository.save(&snapshot) {
            Ok(_) => {
                self.emit(StoreEvent::Persisted {
                    id: snapshot.id,
                    replaced: None,
                });
                true
            }
            Err(e) => {
                self.report_failure(&snapshot.id, e);
                false
            }
        }
    }

    fn persist_delete(&mut self, id: &LockerId) {
        let Some(repository) = self.repository_mut() else {
            return;
        };
        match repository.delete(id) {
            Ok(()) => self.emit(StoreEvent::Persisted {
                id: id.clone(),
                replaced: None,
            }),
            Err(e) => self.report_failure(id, e),
        }
    }

    /// Propagate a persisted id to children and history
    fn remap_id(&mut self, from: &LockerId, to: &LockerId) {
        for locker in &mut self.lockers {
            if locker.parent_id.as_ref() == Some(from) {
                locker.parent_id = Some(to.clone());
            }
        }
        self.history.remap_id(from, to);
    }
}
