//! Rotation utilities for placed lockers.
//!
//! ## Rotation Convention
//!
//! Rotation uses the screen convention: clockwise positive angles, in degrees,
//! with the Y axis pointing down.
//! - 0° = no rotation
//! - 90° = rotated clockwise (right becomes down)
//! - 180° = upside down
//! - 270° = rotated counter-clockwise (right becomes up)
//!
//! Locker rotation values are cumulative. They are never wrapped into
//! `[0, 360)` while editing; [`normalize_degrees`] exists for display only.
//!
//! ## Rotated Bounds
//!
//! A rotated rectangle is reduced to its axis-aligned bounding box by
//! rotating its four corners about its own center and taking the min/max
//! over the rotated corners.

use crate::layout::types::{Bounds, Point, Rect};

/// Represents a 2D rotation transformation around a center point.
#[derive(Debug, Clone, Copy)]
pub struct RotationTransform {
    /// Rotation angle in degrees (clockwise positive)
    pub angle_degrees: f64,
    /// Center point of rotation
    pub center: Point,
}

impl RotationTransform {
    pub fn new(angle_degrees: f64, center: Point) -> Self {
        Self {
            angle_degrees,
            center,
        }
    }

    /// Check if this is effectively a no-op (0° rotation).
    pub fn is_identity(&self) -> bool {
        self.angle_degrees.abs() < f64::EPSILON
    }

    /// Rotate a point around the center using the standard 2D rotation matrix.
    ///
    /// ```text
    /// x' = cx + (x - cx) * cos(θ) - (y - cy) * sin(θ)
    /// y' = cy + (x - cx) * sin(θ) + (y - cy) * cos(θ)
    /// ```
    pub fn transform_point(&self, point: Point) -> Point {
        if self.is_identity() {
            return point;
        }

        let radians = self.angle_degrees.to_radians();
        let cos_a = radians.cos();
        let sin_a = radians.sin();

        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;

        Point {
            x: self.center.x + dx * cos_a - dy * sin_a,
            y: self.center.y + dx * sin_a + dy * cos_a,
        }
    }

    /// Axis-aligned bounds of the rotated image of `bounds`
    pub fn transform_bounds(&self, bounds: &Bounds) -> Bounds {
        if self.is_identity() {
            return *bounds;
        }

        let corners = [
            Point::new(bounds.left, bounds.top),
            Point::new(bounds.right, bounds.top),
            Point::new(bounds.right, bounds.bottom),
            Point::new(bounds.left, bounds.bottom),
        ];

        // Four corners always yield a box
        Bounds::enclosing(corners.iter().map(|p| self.transform_point(*p))).unwrap_or(*bounds)
    }
}

/// Axis-aligned bounding box of a rectangle rotated about its own center.
pub fn rotated_bounds(rect: &Rect) -> Bounds {
    let transform = RotationTransform::new(rect.rotation, rect.center());
    transform.transform_bounds(&rect.unrotated_bounds())
}

/// Wrap a cumulative rotation into `[0, 360)` for display.
pub fn normalize_degrees(rotation: f64) -> f64 {
    let wrapped = rotation.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
