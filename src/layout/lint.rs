//! Lint engine for detecting layout defects.
//!
//! Checks a whole locker collection for mechanical issues: overlapping
//! lockers within a zone, lockers outside their zone, and tiers whose
//! parent is gone. Also groups touching lockers for unified selection
//! outlines.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{Locker, LockerId, ViewMode, Zone};

use super::transform::rotated_bounds;
use super::types::{overlap, Bounds};

/// A lint warning about a layout defect
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Overlap,
    Containment,
    Orphan,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Containment => write!(f, "containment"),
            LintCategory::Orphan => write!(f, "orphan"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// Run all lint checks on a layout.
pub fn check(
    lockers: &[Locker],
    zones: &[Zone],
    view: ViewMode,
    tolerance: f64,
) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_overlaps(lockers, view, tolerance, &mut warnings);
    if view == ViewMode::Floor {
        check_containment(lockers, zones, &mut warnings);
    }
    check_orphans(lockers, &mut warnings);
    warnings
}

fn placed_bounds(lockers: &[Locker], view: ViewMode) -> Vec<(&Locker, Bounds)> {
    lockers
        .iter()
        .filter_map(|l| l.rect(view).map(|r| (l, rotated_bounds(&r))))
        .collect()
}

fn display_name(locker: &Locker) -> String {
    if locker.label.is_empty() {
        format!("\"{}\"", locker.id)
    } else {
        format!("\"{}\"", locker.label)
    }
}

fn check_overlaps(
    lockers: &[Locker],
    view: ViewMode,
    tolerance: f64,
    warnings: &mut Vec<LintWarning>,
) {
    let placed = placed_bounds(lockers, view);
    for (i, (a, a_bounds)) in placed.iter().enumerate() {
        for (b, b_bounds) in placed.iter().skip(i + 1) {
            if a.zone_id != b.zone_id {
                continue;
            }
            let o = overlap(a_bounds, b_bounds);
            if o.exceeds(tolerance) {
                warnings.push(LintWarning {
                    category: LintCategory::Overlap,
                    message: format!(
                        "{} and {} overlap by {:.1} x {:.1}",
                        display_name(a),
                        display_name(b),
                        o.width,
                        o.height
                    ),
                });
            }
        }
    }
}

fn check_containment(lockers: &[Locker], zones: &[Zone], warnings: &mut Vec<LintWarning>) {
    let zone_bounds: HashMap<&str, Bounds> = zones
        .iter()
        .map(|z| (z.id.as_str(), z.rect().unrotated_bounds()))
        .collect();

    for (locker, bounds) in placed_bounds(lockers, ViewMode::Floor) {
        // Unknown zones carry no geometry to check against
        let Some(zone) = zone_bounds.get(locker.zone_id.as_str()) else {
            continue;
        };
        if !zone.contains_bounds(&bounds) {
            warnings.push(LintWarning {
                category: LintCategory::Containment,
                message: format!(
                    "{} extends outside zone \"{}\"",
                    display_name(locker),
                    locker.zone_id
                ),
            });
        }
    }
}

fn check_orphans(lockers: &[Locker], warnings: &mut Vec<LintWarning>) {
    let ids: HashSet<&LockerId> = lockers.iter().map(|l| &l.id).collect();
    for locker in lockers {
        if let Some(parent) = &locker.parent_id {
            if !ids.contains(parent) {
                warnings.push(LintWarning {
                    category: LintCategory::Orphan,
                    message: format!(
                        "{} references missing parent \"{}\"",
                        display_name(locker),
                        parent
                    ),
                });
            }
        }
    }
}

/// Group lockers whose bounds come within `threshold` of each other.
///
/// Only lockers in the same zone are joined. Groups are returned in the
/// order of their first member in `lockers`; singletons are included.
pub fn adjacent_groups(lockers: &[Locker], view: ViewMode, threshold: f64) -> Vec<Vec<LockerId>> {
    let placed = placed_bounds(lockers, view);
    let mut parent: Vec<usize> = (0..placed.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            let (a, a_bounds) = &placed[i];
            let (b, b_bounds) = &placed[j];
            if a.zone_id == b.zone_id && a_bounds.gap_to(b_bounds) <= threshold {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[rj.max(ri)] = rj.min(ri);
                }
            }
        }
    }

    let mut groups: Vec<Vec<LockerId>> = Vec::new();
    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    for i in 0..placed.len() {
        let root = find(&mut parent, i);
        let slot = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(placed[i].0.id.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LockerType, NewLocker};

    fn locker(id: &str, zone: &str, x: f64, y: f64) -> Locker {
        NewLocker::of_type(&LockerType::defaults()[0], zone, x, y)
            .with_label(id)
            .into_locker(LockerId::new(id))
    }

    fn zone(id: &str) -> Zone {
        Zone {
            id: id.to_string(),
            name: id.to_string(),
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 200.0,
            color: None,
        }
    }

    #[test]
    fn test_clean_layout_has_no_warnings() {
        let lockers = vec![locker("L1", "z", 0.0, 0.0), locker("L2", "z", 40.0, 0.0)];
        assert!(check(&lockers, &[zone("z")], ViewMode::Floor, 0.0).is_empty());
    }

    #[test]
    fn test_overlap_warning() {
        let lockers = vec![locker("L1", "z", 0.0, 0.0), locker("L2", "z", 30.0, 0.0)];
        let warnings = check(&lockers, &[zone("z")], ViewMode::Floor, 0.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "overlap: \"L1\" and \"L2\" overlap by 10.0 x 40.0"
        );
    }

    #[test]
    fn test_containment_warning() {
        let lockers = vec![locker("L1", "z", 180.0, 0.0)];
        let warnings = check(&lockers, &[zone("z")], ViewMode::Floor, 0.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Containment);
    }

    #[test]
    fn test_orphan_warning() {
        let mut tier = locker("T1", "z", 0.0, 0.0);
        tier.parent_id = Some(LockerId::new("gone"));
        let warnings = check(&[tier], &[], ViewMode::Floor, 0.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Orphan);
    }

    #[test]
    fn test_adjacent_groups() {
        let lockers = vec![
            locker("L1", "z", 0.0, 0.0),
            locker("L2", "z", 40.0, 0.0),
            locker("L3", "z", 200.0, 0.0),
            locker("L4", "z", 82.0, 0.0),
            locker("L5", "other", 40.0, 0.0),
        ];
        let groups = adjacent_groups(&lockers, ViewMode::Floor, 2.0);
        let names: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.iter().map(|id| id.as_str()).collect())
            .collect();
        assert_eq!(
            names,
            vec![vec!["L1", "L2", "L4"], vec!["L3"], vec!["L5"]]
        );
    }
}
