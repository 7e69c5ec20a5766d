//! Snapping helpers for rotation, grid, and neighbor alignment.
//!
//! Rotation snapping works on the cumulative value, so a locker spun past
//! 360° still snaps to the nearest multiple of the step without jumping back
//! to zero.

use super::config::LayoutConfig;
use super::transform::rotated_bounds;
use super::types::Rect;

/// Snap a cumulative rotation to the nearest multiple of `step`.
pub fn snap_rotation(rotation: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return rotation;
    }
    (rotation / step).round() * step
}

/// Snap only when the rotation is within `threshold` degrees of a snap point.
pub fn snap_rotation_within(rotation: f64, step: f64, threshold: f64) -> f64 {
    let snapped = snap_rotation(rotation, step);
    if (snapped - rotation).abs() <= threshold {
        snapped
    } else {
        rotation
    }
}

/// Snap a coordinate to the nearest grid line
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Which neighbor edge an axis snapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapEdge {
    /// Candidate placed to the right of / below the neighbor
    After,
    /// Candidate placed to the left of / above the neighbor
    Before,
    /// Candidate's leading edge aligned with the neighbor's
    Aligned,
}

/// Result of neighbor snapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub snapped_x: Option<SnapEdge>,
    pub snapped_y: Option<SnapEdge>,
}

/// Nearest per-axis correction: (distance moved, edge)
fn best_shift(options: &[(f64, SnapEdge)], threshold: f64) -> Option<(f64, SnapEdge)> {
    options
        .iter()
        .copied()
        .filter(|(shift, _)| shift.abs() <= threshold)
        .min_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
}

/// Pull a candidate's edges onto nearby neighbor edges.
///
/// Opposite edges snap with `config.minimum_gap` between them; leading
/// edges (left/left, top/top) snap flush. Each axis snaps independently,
/// only when the correction is within `config.snap_threshold`.
pub fn snap_to_neighbors(candidate: &Rect, neighbors: &[Rect], config: &LayoutConfig) -> SnapResult {
    let bounds = rotated_bounds(candidate);
    let gap = config.minimum_gap;

    let mut x_options = Vec::new();
    let mut y_options = Vec::new();

    for neighbor in neighbors.iter().map(rotated_bounds) {
        if spans_overlap(bounds.top, bounds.bottom, neighbor.top, neighbor.bottom, config.snap_threshold) {
            x_options.push((neighbor.right + gap - bounds.left, SnapEdge::After));
            x_options.push((neighbor.left - gap - bounds.right, SnapEdge::Before));
        }
        if spans_overlap(bounds.left, bounds.right, neighbor.left, neighbor.right, config.snap_threshold) {
            y_options.push((neighbor.bottom + gap - bounds.top, SnapEdge::After));
            y_options.push((neighbor.top - gap - bounds.bottom, SnapEdge::Before));
        }
        x_options.push((neighbor.left - bounds.left, SnapEdge::Aligned));
        y_options.push((neighbor.top - bounds.top, SnapEdge::Aligned));
    }

    let x = best_shift(&x_options, config.snap_threshold);
    let y = best_shift(&y_options, config.snap_threshold);

    SnapResult {
        x: candidate.x + x.map(|(s, _)| s).unwrap_or(0.0),
        y: candidate.y + y.map(|(s, _)| s).unwrap_or(0.0),
        snapped_x: x.map(|(_, e)| e),
        snapped_y: y.map(|(_, e)| e),
    }
}

/// Whether two 1D spans come within `slack` of each other
fn spans_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64, slack: f64) -> bool {
    a_start < b_end + slack && b_start < a_end + slack
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rotation_cumulative() {
        assert_eq!(snap_rotation(44.0, 45.0), 45.0);
        assert_eq!(snap_rotation(400.0, 45.0), 405.0);
        assert_eq!(snap_rotation(-50.0, 45.0), -45.0);
        // 358° snaps forward to 360°, not back to 0°
        assert_eq!(snap_rotation(358.0, 45.0), 360.0);
        assert_eq!(snap_rotation(12.5, 0.0), 12.5);
    }

    #[test]
    fn test_snap_rotation_within_threshold() {
        assert_eq!(snap_rotation_within(88.0, 45.0, 5.0), 90.0);
        assert_eq!(snap_rotation_within(70.0, 45.0, 5.0), 70.0);
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(14.0, 10.0), 10.0);
        assert_eq!(snap_to_grid(15.0, 10.0), 20.0);
        assert_eq!(snap_to_grid(-4.0, 10.0), 0.0);
        assert_eq!(snap_to_grid(7.3, 0.0), 7.3);
    }

    #[test]
    fn test_snap_right_of_neighbor_with_gap() {
        let config = LayoutConfig::default().with_minimum_gap(4.0);
        let neighbor = Rect::new(0.0, 0.0, 40.0, 40.0);
        let candidate = Rect::new(47.0, 1.0, 40.0, 40.0);
        let result = snap_to_neighbors(&candidate, &[neighbor], &config);
        assert_eq!(result.x, 44.0);
        assert_eq!(result.snapped_x, Some(SnapEdge::After));
        // Top edges align
        assert_eq!(result.y, 0.0);
        assert_eq!(result.snapped_y, Some(SnapEdge::Aligned));
    }

    #[test]
    fn test_no_snap_when_far() {
        let config = LayoutConfig::default();
        let neighbor = Rect::new(0.0, 0.0, 40.0, 40.0);
        let candidate = Rect::new(200.0, 200.0, 40.0, 40.0);
        let result = snap_to_neighbors(&candidate, &[neighbor], &config);
        assert_eq!((result.x, result.y), (200.0, 200.0));
        assert_eq!(result.snapped_x, None);
        assert_eq!(result.snapped_y, None);
    }
}
