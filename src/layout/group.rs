//! Group transforms: rotating and moving a selection together.
//!
//! A rotation gesture fixes its pivot once, when the gesture begins, and
//! every increment is computed from the members' initial state. Recomputing
//! the pivot from the already-rotated members makes the group drift.

use crate::model::{Locker, LockerId, ViewMode};

use super::transform::RotationTransform;
use super::types::{Bounds, Point};

/// Center of the selection's combined (un-rotated) bounding box.
///
/// Members without a position in `view` are ignored. Returns `None` when no
/// member is placed.
pub fn selection_center(selection: &[Locker], view: ViewMode) -> Option<Point> {
    selection
        .iter()
        .filter_map(|l| l.rect(view))
        .map(|r| r.unrotated_bounds())
        .reduce(|a: Bounds, b| a.union(&b))
        .map(|b| b.center())
}

#[derive(Debug, Clone)]
struct MemberStart {
    id: LockerId,
    position: Point,
    rotation: f64,
}

/// A continuous rotation gesture over a fixed selection
#[derive(Debug, Clone)]
pub struct RotationGesture {
    view: ViewMode,
    pivot: Point,
    /// A lone member without an explicit pivot spins in place
    spin_in_place: bool,
    members: Vec<MemberStart>,
}

impl RotationGesture {
    /// Start a gesture, computing the pivot unless one is supplied.
    ///
    /// Returns `None` when no member is placed in `view`.
    pub fn begin(selection: &[Locker], view: ViewMode, pivot: Option<Point>) -> Option<Self> {
        let members: Vec<MemberStart> = selection
            .iter()
            .filter_map(|l| {
                l.position(view).map(|(x, y)| MemberStart {
                    id: l.id.clone(),
                    position: Point::new(x, y),
                    rotation: l.rotation,
                })
            })
            .collect();
        if members.is_empty() {
            return None;
        }

        let spin_in_place = pivot.is_none() && members.len() == 1;
        let pivot = match pivot {
            Some(p) => p,
            None => selection_center(selection, view)?,
        };

        Some(Self {
            view,
            pivot,
            spin_in_place,
            members,
        })
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &LockerId> {
        self.members.iter().map(|m| &m.id)
    }

    /// Member positions and rotations after `total_delta` degrees from the
    /// gesture start: `(id, x, y, rotation)`.
    pub fn angle_to(&self, total_delta: f64) -> Vec<(LockerId, f64, f64, f64)> {
        let transform = RotationTransform::new(total_delta, self.pivot);
        self.members
            .iter()
            .map(|m| {
                let p = if self.spin_in_place {
                    m.position
                } else {
                    transform.transform_point(m.position)
                };
                (m.id.clone(), p.x, p.y, m.rotation + total_delta)
            })
            .collect()
    }

    /// Apply the gesture at `total_delta` to copies of `selection`
    pub fn apply(&self, selection: &[Locker], total_delta: f64) -> Vec<Locker> {
        let updates = self.angle_to(total_delta);
        selection
            .iter()
            .map(|locker| {
                let mut updated = locker.clone();
                if let Some((_, x, y, rotation)) = updates.iter().find(|(id, ..)| *id == locker.id) {
                    updated.set_position(self.view, *x, *y);
                    updated.rotation = *rotation;
                }
                updated
            })
            .collect()
    }
}

/// Rotate a selection by `delta_degrees` about `pivot` (or the selection's
/// center), returning updated copies.
///
/// Rotation is added to each member's cumulative value and never wrapped.
pub fn rotate_group(
    selection: &[Locker],
    delta_degrees: f64,
    view: ViewMode,
    pivot: Option<Point>,
) -> Vec<Locker> {
    match RotationGesture::begin(selection, view, pivot) {
        Some(gesture) => gesture.apply(selection, delta_degrees),
        None => selection.to_vec(),
    }
}

/// Translate every placed member of a selection
pub fn move_group(selection: &[Locker], dx: f64, dy: f64, view: ViewMode) -> Vec<Locker> {
    selection
        .iter()
        .map(|locker| {
            let mut moved = locker.clone();
            if let Some((x, y)) = locker.position(view) {
                moved.set_position(view, x + dx, y + dy);
            }
            moved
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LockerType, NewLocker};

    const EPSILON: f64 = 1e-9;

    fn locker(id: &str, x: f64, y: f64) -> Locker {
        NewLocker::of_type(&LockerType::defaults()[0], "z", x, y).into_locker(LockerId::new(id))
    }

    fn pos(l: &Locker) -> (f64, f64) {
        l.position(ViewMode::Floor).unwrap()
    }

    #[test]
    fn test_selection_center() {
        let sel = vec![locker("a", 0.0, 0.0), locker("b", 60.0, 20.0)];
        assert_eq!(
            selection_center(&sel, ViewMode::Floor),
            Some(Point::new(50.0, 30.0))
        );
        assert_eq!(selection_center(&sel, ViewMode::Front), None);
    }

    #[test]
    fn test_single_member_spins_in_place() {
        let sel = vec![locker("a", 10.0, 10.0)];
        let out = rotate_group(&sel, 30.0, ViewMode::Floor, None);
        assert_eq!(pos(&out[0]), (10.0, 10.0));
        assert_eq!(out[0].rotation, 30.0);
    }

    #[test]
    fn test_gesture_pivot_is_fixed() {
        let sel = vec![locker("a", 0.0, 0.0), locker("b", 100.0, 0.0)];
        let gesture = RotationGesture::begin(&sel, ViewMode::Floor, None).unwrap();
        let pivot = gesture.pivot();

        // Many small increments land exactly where one large step does
        let stepped = (1..=90).map(|d| gesture.apply(&sel, d as f64)).last().unwrap();
        let direct = rotate_group(&sel, 90.0, ViewMode::Floor, Some(pivot));
        for (s, d) in stepped.iter().zip(&direct) {
            let (sx, sy) = pos(s);
            let (dx, dy) = pos(d);
            assert!((sx - dx).abs() < EPSILON && (sy - dy).abs() < EPSILON);
        }
        assert_eq!(gesture.pivot(), pivot);
    }

    #[test]
    fn test_move_group_skips_unplaced() {
        let mut tier = locker("t", 0.0, 0.0);
        tier.x = None;
        tier.y = None;
        let sel = vec![locker("a", 0.0, 0.0), tier];
        let out = move_group(&sel, 5.0, -5.0, ViewMode::Floor);
        assert_eq!(pos(&out[0]), (5.0, -5.0));
        assert_eq!(out[1].x, None);
    }
}
