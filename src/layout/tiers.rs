//! Tier stacking in the front view.
//!
//! Tiers are child lockers stacked vertically above a parent. Screen Y grows
//! downward, so each new tier sits at a smaller `front_view_y` than the one
//! below it. All tiers share the parent's `front_view_x`.

use crate::error::LockerError;
use crate::model::{Locker, LockerId, LockerStatus, NewLocker};

/// Parameters for one tier-stacking request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRequest {
    pub tier_count: u32,
    /// First tier level to create; defaults to one above the highest child
    pub base_tier_level: Option<u32>,
    /// Unscaled tier height
    pub tier_height: f64,
    /// Unscaled gap between tiers
    pub gap: f64,
    /// Visual magnification applied to height and gap
    pub scale: f64,
    pub max_tiers: u32,
}

impl TierRequest {
    /// Vertical distance between consecutive tiers
    pub fn step(&self) -> f64 {
        self.tier_height * self.scale + self.gap * self.scale
    }
}

/// What the store must do to apply a tier request
#[derive(Debug, Clone, PartialEq)]
pub struct TierPlan {
    /// Existing children whose levels are replaced
    pub replaced: Vec<LockerId>,
    /// New children, lowest tier first
    pub tiers: Vec<NewLocker>,
}

/// Compute the tiers to stack on `parent`.
///
/// `children` are the parent's current tiers. Children at conflicting levels
/// are listed for removal and do not count as the stacking origin.
pub fn plan_tiers(
    parent: &Locker,
    children: &[&Locker],
    request: &TierRequest,
) -> Result<TierPlan, LockerError> {
    if request.tier_count < 1 || request.tier_count > request.max_tiers {
        return Err(LockerError::InvalidTierCount {
            count: request.tier_count,
            max: request.max_tiers,
        });
    }
    if let Some(grandparent) = &parent.parent_id {
        return Err(LockerError::NotAParent {
            id: parent.id.clone(),
            parent: grandparent.clone(),
        });
    }
    let (front_x, front_y) = match (parent.front_view_x, parent.front_view_y) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            return Err(LockerError::MissingCoordinates {
                id: parent.id.clone(),
            })
        }
    };

    let overflow = |base: u32| LockerError::TierLevelOverflow {
        id: parent.id.clone(),
        base,
    };
    let base_level = match request.base_tier_level {
        Some(level) => level,
        None => {
            let highest = children.iter().map(|c| c.tier_level).max().unwrap_or(0);
            highest.checked_add(1).ok_or_else(|| overflow(highest))?
        }
    };
    let end_level = base_level
        .checked_add(request.tier_count)
        .ok_or_else(|| overflow(base_level))?;
    let levels = base_level..end_level;

    let (conflicting, kept): (Vec<&Locker>, Vec<&Locker>) = children
        .iter()
        .copied()
        .partition(|c| levels.contains(&c.tier_level));

    // Stack above the topmost surviving child, or the parent itself
    let reference_y = kept
        .iter()
        .filter_map(|c| c.front_view_y)
        .fold(None, |top: Option<f64>, y| Some(top.map_or(y, |t| t.min(y))))
        .unwrap_or(front_y);

    let step = request.step();
    let tiers = levels
        .enumerate()
        .map(|(i, level)| NewLocker {
            label: format!("{}-T{}", parent.label, level),
            number: parent
                .number
                .and_then(|n| n.checked_mul(10)?.checked_add(level)),
            x: None,
            y: None,
            width: parent.width,
            height: parent.height,
            depth: parent.depth,
            rotation: Some(0.0),
            front_view_x: Some(front_x),
            front_view_y: Some((reference_y - (i as f64 + 1.0) * step).round()),
            zone_id: parent.zone_id.clone(),
            type_id: parent.type_id.clone(),
            status: LockerStatus::Available,
            parent_id: Some(parent.id.clone()),
            tier_level: level,
            group_num: parent.group_num,
            door_direction: None,
            floor: parent.floor,
            gender: parent.gender.clone(),
            assignment: Default::default(),
        })
        .collect();

    Ok(TierPlan {
        replaced: conflicting.iter().map(|c| c.id.clone()).collect(),
        tiers,
    })
}
