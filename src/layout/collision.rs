//! Zone-scoped collision detection between placed lockers.
//!
//! Two lockers collide when their rotated bounding boxes overlap by more
//! than `tolerance` on *both* axes. Touching edges (zero overlap) never
//! collide, so lockers can sit flush against each other.

use crate::model::{Locker, LockerId, ViewMode};

use super::transform::rotated_bounds;
use super::types::{overlap, Rect};

/// A locker position being tested for legality
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Id of the locker being moved, excluded from the check
    pub id: Option<&'a LockerId>,
    pub rect: Rect,
}

impl<'a> Candidate<'a> {
    pub fn new(rect: Rect) -> Self {
        Self { id: None, rect }
    }

    /// Candidate for an existing locker being moved or rotated in place
    pub fn moving(id: &'a LockerId, rect: Rect) -> Self {
        Self { id: Some(id), rect }
    }

    /// Candidate describing a locker at its current position
    pub fn of(locker: &'a Locker, view: ViewMode) -> Option<Self> {
        locker.rect(view).map(|rect| Self::moving(&locker.id, rect))
    }
}

/// Return the first locker in `zone_id` that the candidate collides with.
///
/// Lockers not placed in `view` are skipped.
pub fn find_collision<'l>(
    candidate: &Candidate<'_>,
    existing: impl IntoIterator<Item = &'l Locker>,
    zone_id: &str,
    tolerance: f64,
    view: ViewMode,
) -> Option<&'l Locker> {
    let bounds = rotated_bounds(&candidate.rect);

    existing
        .into_iter()
        .filter(|other| other.zone_id == zone_id)
        .filter(|other| candidate.id != Some(&other.id))
        .find(|other| {
            other
                .rect(view)
                .map(|rect| overlap(&bounds, &rotated_bounds(&rect)).exceeds(tolerance))
                .unwrap_or(false)
        })
}

/// Whether placing the candidate would collide with any locker in the zone
pub fn check_collision<'l>(
    candidate: &Candidate<'_>,
    existing: impl IntoIterator<Item = &'l Locker>,
    zone_id: &str,
    tolerance: f64,
    view: ViewMode,
) -> bool {
    find_collision(candidate, existing, zone_id, tolerance, view).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LockerType, NewLocker};

    fn locker(id: &str, zone: &str, x: f64, y: f64) -> Locker {
        NewLocker::of_type(&LockerType::defaults()[0], zone, x, y).into_locker(LockerId::new(id))
    }

    #[test]
    fn test_flush_adjacency_is_not_collision() {
        let placed = vec![locker("a", "z", 0.0, 0.0)];
        let candidate = Candidate::new(Rect::new(40.0, 0.0, 40.0, 40.0));
        assert!(!check_collision(&candidate, &placed, "z", 0.0, ViewMode::Floor));
    }

    #[test]
    fn test_overlap_beyond_tolerance_collides() {
        let placed = vec![locker("a", "z", 0.0, 0.0)];
        let candidate = Candidate::new(Rect::new(35.0, 10.0, 40.0, 40.0));
        assert!(check_collision(&candidate, &placed, "z", 0.0, ViewMode::Floor));
        assert!(check_collision(&candidate, &placed, "z", 4.9, ViewMode::Floor));
        assert!(!check_collision(&candidate, &placed, "z", 5.0, ViewMode::Floor));
    }

    #[test]
    fn test_other_zone_never_collides() {
        let placed = vec![locker("a", "zone-2", 0.0, 0.0)];
        let candidate = Candidate::new(Rect::new(0.0, 0.0, 40.0, 40.0));
        assert!(!check_collision(&candidate, &placed, "zone-1", 0.0, ViewMode::Floor));
    }

    #[test]
    fn test_self_is_excluded() {
        let placed = vec![locker("a", "z", 0.0, 0.0)];
        let rect = Rect::new(5.0, 5.0, 40.0, 40.0);
        let candidate = Candidate::moving(&placed[0].id, rect);
        assert!(!check_collision(&candidate, &placed, "z", 0.0, ViewMode::Floor));
    }

    #[test]
    fn test_rotation_expands_footprint() {
        // A 45° square reaches past its unrotated edge
        let placed = vec![locker("a", "z", 0.0, 0.0)];
        let flush = Rect::new(40.0, 0.0, 40.0, 40.0);
        assert!(!check_collision(&Candidate::new(flush), &placed, "z", 0.0, ViewMode::Floor));
        let rotated = flush.with_rotation(45.0);
        assert!(check_collision(&Candidate::new(rotated), &placed, "z", 1.0, ViewMode::Floor));
    }

    #[test]
    fn test_unplaced_lockers_are_skipped() {
        let mut tier = locker("t", "z", 0.0, 0.0);
        tier.x = None;
        tier.y = None;
        let candidate = Candidate::new(Rect::new(0.0, 0.0, 40.0, 40.0));
        assert!(!check_collision(&candidate, [&tier], "z", 0.0, ViewMode::Floor));
    }

    #[test]
    fn test_find_collision_reports_first_hit() {
        let placed = vec![locker("a", "z", 0.0, 0.0), locker("b", "z", 100.0, 0.0)];
        let candidate = Candidate::new(Rect::new(90.0, 0.0, 40.0, 40.0));
        let hit = find_collision(&candidate, &placed, "z", 0.0, ViewMode::Floor);
        assert_eq!(hit.map(|l| l.id.as_str()), Some("b"));
    }
}
