//! Domain records: lockers, zones, and locker types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::types::Rect;

/// Opaque locker identity.
///
/// Lockers receive a temporary id (`temp-<n>`) when created locally; the
/// persistence layer swaps it for the stored id after the first save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockerId(pub String);

const TEMP_PREFIX: &str = "temp-";

impl LockerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn temporary(seq: u64) -> Self {
        Self(format!("{TEMP_PREFIX}{seq}"))
    }

    /// True until persistence has assigned a real id
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LockerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Usage status of a locker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockerStatus {
    #[default]
    Available,
    Occupied,
    Expired,
    Maintenance,
}

impl LockerStatus {
    pub const ALL: [LockerStatus; 4] = [
        LockerStatus::Available,
        LockerStatus::Occupied,
        LockerStatus::Expired,
        LockerStatus::Maintenance,
    ];
}

impl fmt::Display for LockerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockerStatus::Available => write!(f, "available"),
            LockerStatus::Occupied => write!(f, "occupied"),
            LockerStatus::Expired => write!(f, "expired"),
            LockerStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// Which coordinate space a locker is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Top-down floor plan, positioned by `x`/`y`
    #[default]
    Floor,
    /// Wall elevation, positioned by `front_view_x`/`front_view_y`
    Front,
}

/// Member assignment details, carried through the layout core untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assignment {
    pub member_serial: Option<String>,
    pub member_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub memo: Option<String>,
}

/// A placed rectangular locker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locker {
    pub id: LockerId,
    /// Floor-plan label, e.g. `A-01`
    pub label: String,
    /// Front-view number
    pub number: Option<u32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Cumulative degrees, never normalized on the update path
    pub rotation: f64,
    pub front_view_x: Option<f64>,
    pub front_view_y: Option<f64>,
    pub zone_id: String,
    pub type_id: String,
    pub status: LockerStatus,
    pub parent_id: Option<LockerId>,
    pub tier_level: u32,
    pub group_num: Option<u32>,
    pub door_direction: Option<String>,
    /// Building floor; `None` shows on every floor
    #[serde(default)]
    pub floor: Option<u32>,
    /// Gender restriction code, inherited by tiers
    #[serde(default)]
    pub gender: Option<String>,
    pub assignment: Assignment,
}

impl Locker {
    /// Position in the given view, if the locker is placed there
    pub fn position(&self, view: ViewMode) -> Option<(f64, f64)> {
        match view {
            ViewMode::Floor => self.x.zip(self.y),
            ViewMode::Front => self.front_view_x.zip(self.front_view_y),
        }
    }

    pub fn set_position(&mut self, view: ViewMode, x: f64, y: f64) {
        match view {
            ViewMode::Floor => {
                self.x = Some(x);
                self.y = Some(y);
            }
            ViewMode::Front => {
                self.front_view_x = Some(x);
                self.front_view_y = Some(y);
            }
        }
    }

    /// The locker's rectangle in the given view
    pub fn rect(&self, view: ViewMode) -> Option<Rect> {
        self.position(view)
            .map(|(x, y)| Rect::new(x, y, self.width, self.height).with_rotation(self.rotation))
    }

    /// Front-view-only tiers have no floor position
    pub fn is_front_view_only(&self) -> bool {
        self.position(ViewMode::Floor).is_none() && self.position(ViewMode::Front).is_some()
    }

    /// Whether the locker shows on `floor`. Lockers without a floor show everywhere.
    pub fn is_on_floor(&self, floor: u32) -> bool {
        self.floor.map_or(true, |f| f == floor)
    }
}

/// Fields for a locker that does not exist yet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewLocker {
    pub label: String,
    pub number: Option<u32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Defaults to 0 when absent
    pub rotation: Option<f64>,
    pub front_view_x: Option<f64>,
    pub front_view_y: Option<f64>,
    pub zone_id: String,
    pub type_id: String,
    pub status: LockerStatus,
    pub parent_id: Option<LockerId>,
    pub tier_level: u32,
    pub group_num: Option<u32>,
    pub door_direction: Option<String>,
    pub floor: Option<u32>,
    pub gender: Option<String>,
    pub assignment: Assignment,
}

impl NewLocker {
    /// A floor-placed locker sized from a type
    pub fn of_type(locker_type: &LockerType, zone_id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: locker_type.width,
            height: locker_type.height,
            depth: locker_type.depth,
            zone_id: zone_id.into(),
            type_id: locker_type.id.clone(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_front_view(mut self, x: f64, y: f64) -> Self {
        self.front_view_x = Some(x);
        self.front_view_y = Some(y);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn on_floor(mut self, floor: u32) -> Self {
        self.floor = Some(floor);
        self
    }

    pub(crate) fn into_locker(self, id: LockerId) -> Locker {
        let rotation = self.rotation.filter(|r| r.is_finite()).unwrap_or(0.0);
        Locker {
            id,
            label: self.label,
            number: self.number,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            depth: self.depth,
            rotation,
            front_view_x: self.front_view_x,
            front_view_y: self.front_view_y,
            zone_id: self.zone_id,
            type_id: self.type_id,
            status: self.status,
            parent_id: self.parent_id,
            tier_level: self.tier_level,
            group_num: self.group_num,
            door_direction: self.door_direction,
            floor: self.floor,
            gender: self.gender,
            assignment: self.assignment,
        }
    }
}

/// Typed partial update.
///
/// `None` leaves a field untouched. Nullable fields use `Option<Option<_>>`
/// so that `Some(None)` clears them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LockerPatch {
    pub label: Option<String>,
    pub number: Option<Option<u32>>,
    pub x: Option<Option<f64>>,
    pub y: Option<Option<f64>>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub rotation: Option<f64>,
    pub front_view_x: Option<Option<f64>>,
    pub front_view_y: Option<Option<f64>>,
    pub zone_id: Option<String>,
    pub type_id: Option<String>,
    pub status: Option<LockerStatus>,
    pub group_num: Option<Option<u32>>,
    pub door_direction: Option<Option<String>>,
    pub floor: Option<Option<u32>>,
    pub gender: Option<Option<String>>,
    pub assignment: Option<Assignment>,
}

impl LockerPatch {
    pub fn position(view: ViewMode, x: f64, y: f64) -> Self {
        match view {
            ViewMode::Floor => Self {
                x: Some(Some(x)),
                y: Some(Some(y)),
                ..Self::default()
            },
            ViewMode::Front => Self {
                front_view_x: Some(Some(x)),
                front_view_y: Some(Some(y)),
                ..Self::default()
            },
        }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn status(status: LockerStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Shallow-merge onto `locker`. Rotation is written as given; callers
    /// sanitize it first.
    pub(crate) fn apply_to(self, locker: &mut Locker) {
        if let Some(v) = self.label {
            locker.label = v;
        }
        if let Some(v) = self.number {
            locker.number = v;
        }
        if let Some(v) = self.x {
            locker.x = v;
        }
        if let Some(v) = self.y {
            locker.y = v;
        }
        if let Some(v) = self.width {
            locker.width = v;
        }
        if let Some(v) = self.height {
            locker.height = v;
        }
        if let Some(v) = self.depth {
            locker.depth = v;
        }
        if let Some(v) = self.rotation {
            locker.rotation = v;
        }
        if let Some(v) = self.front_view_x {
            locker.front_view_x = v;
        }
        if let Some(v) = self.front_view_y {
            locker.front_view_y = v;
        }
        if let Some(v) = self.zone_id {
            locker.zone_id = v;
        }
        if let Some(v) = self.type_id {
            locker.type_id = v;
        }
        if let Some(v) = self.status {
            locker.status = v;
        }
        if let Some(v) = self.group_num {
            locker.group_num = v;
        }
        if let Some(v) = self.door_direction {
            locker.door_direction = v;
        }
        if let Some(v) = self.floor {
            locker.floor = v;
        }
        if let Some(v) = self.gender {
            locker.gender = v;
        }
        if let Some(v) = self.assignment {
            locker.assignment = v;
        }
    }
}

/// Named rectangular region scoping collision checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Option<String>,
}

impl Zone {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Footprint template supplying default dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockerType {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub color: String,
}

impl LockerType {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: f64,
        depth: f64,
        height: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            depth,
            height,
            color: color.into(),
        }
    }

    /// Catalog used when no types have been configured
    pub fn defaults() -> Vec<LockerType> {
        vec![
            LockerType::new("1", "Small", 40.0, 40.0, 40.0, "#3b82f6"),
            LockerType::new("2", "Medium", 50.0, 50.0, 60.0, "#10b981"),
            LockerType::new("3", "Large", 60.0, 60.0, 80.0, "#f59e0b"),
        ]
    }
}

/// Locker counts per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
    pub expired: usize,
    pub maintenance: usize,
}

impl StatusCounts {
    pub fn tally<'a>(lockers: impl IntoIterator<Item = &'a Locker>) -> Self {
        let mut counts = Self::default();
        for locker in lockers {
            counts.total += 1;
            match locker.status {
                LockerStatus::Available => counts.available += 1,
                LockerStatus::Occupied => counts.occupied += 1,
                LockerStatus::Expired => counts.expired += 1,
                LockerStatus::Maintenance => counts.maintenance += 1,
            }
        }
        counts
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} available={} occupied={} expired={} maintenance={}",
            self.total, self.available, self.occupied, self.expired, self.maintenance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locker() -> Locker {
        NewLocker::of_type(&LockerType::defaults()[0], "zone-1", 10.0, 20.0)
            .with_label("A-01")
            .into_locker(LockerId::new("7"))
    }

    #[test]
    fn test_temporary_ids() {
        assert!(LockerId::temporary(3).is_temporary());
        assert_eq!(LockerId::temporary(3).as_str(), "temp-3");
        assert!(!LockerId::new("42").is_temporary());
    }

    #[test]
    fn test_new_locker_defaults_rotation() {
        let l = locker();
        assert_eq!(l.rotation, 0.0);
        let nan = NewLocker {
            rotation: Some(f64::NAN),
            ..NewLocker::default()
        }
        .into_locker(LockerId::new("1"));
        assert_eq!(nan.rotation, 0.0);
    }

    #[test]
    fn test_rect_per_view() {
        let mut l = locker();
        assert_eq!(l.rect(ViewMode::Floor), Some(Rect::new(10.0, 20.0, 40.0, 40.0)));
        assert_eq!(l.rect(ViewMode::Front), None);
        l.set_position(ViewMode::Front, 5.0, 6.0);
        assert_eq!(l.position(ViewMode::Front), Some((5.0, 6.0)));
        assert!(!l.is_front_view_only());
    }

    #[test]
    fn test_patch_clears_nullable_fields() {
        let mut l = locker();
        LockerPatch {
            x: Some(None),
            y: Some(None),
            status: Some(LockerStatus::Expired),
            ..LockerPatch::default()
        }
        .apply_to(&mut l);
        assert_eq!(l.x, None);
        assert_eq!(l.status, LockerStatus::Expired);
        assert_eq!(l.label, "A-01");
    }

    #[test]
    fn test_floor_filter() {
        let mut l = locker();
        assert!(l.is_on_floor(1) && l.is_on_floor(3));
        LockerPatch {
            floor: Some(Some(2)),
            ..LockerPatch::default()
        }
        .apply_to(&mut l);
        assert!(l.is_on_floor(2));
        assert!(!l.is_on_floor(1));
    }

    #[test]
    fn test_status_counts() {
        let mut a = locker();
        let b = locker();
        a.status = LockerStatus::Occupied;
        let counts = StatusCounts::tally([&a, &b]);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.occupied, 1);
        assert_eq!(counts.available, 1);
        assert_eq!(
            counts.to_string(),
            "total=2 available=1 occupied=1 expired=0 maintenance=0"
        );
    }
}
