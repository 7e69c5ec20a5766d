//! Layout engine for locker geometry
//!
//! Pure computations over locker rectangles: rotated bounds, collision
//! checks, snapping, tier stacking, group transforms, and layout lint.
//! Nothing here owns state; [`crate::store::LockerStore`] applies the
//! results.

pub mod collision;
pub mod config;
pub mod group;
pub mod lint;
pub mod snap;
pub mod tiers;
pub mod transform;
pub mod types;

pub use collision::{check_collision, find_collision, Candidate};
pub use config::{ConfigError, LayoutConfig};
pub use group::{move_group, rotate_group, selection_center, RotationGesture};
pub use lint::{adjacent_groups, LintCategory, LintWarning};
pub use snap::{
    snap_rotation, snap_rotation_within, snap_to_grid, snap_to_neighbors, SnapEdge, SnapResult,
};
pub use tiers::{plan_tiers, TierPlan, TierRequest};
pub use transform::{normalize_degrees, rotated_bounds, RotationTransform};
pub use types::*;
