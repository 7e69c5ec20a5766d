//! Core geometric types for the layout engine

/// A 2D point in screen coordinates (Y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle positioned by its top-left corner and rotated about its own center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise positive, cumulative
    pub rotation: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Center point, which is also the rotation origin
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bounds ignoring rotation
    pub fn unrotated_bounds(&self) -> Bounds {
        Bounds {
            left: self.x,
            right: self.x + self.width,
            top: self.y,
            bottom: self.y + self.height,
        }
    }
}

/// An axis-aligned bounding box given by its four edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Bounds>, p| {
            Some(match acc {
                None => Bounds::new(p.x, p.x, p.y, p.y),
                Some(b) => Bounds::new(
                    b.left.min(p.x),
                    b.right.max(p.x),
                    b.top.min(p.y),
                    b.bottom.max(p.y),
                ),
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Check if this box contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Check if `other` lies entirely within this box
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Compute the union of two boxes (smallest box containing both)
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.left.min(other.left),
            self.right.max(other.right),
            self.top.min(other.top),
            self.bottom.max(other.bottom),
        )
    }

    /// Separation between two boxes: the larger of the per-axis gaps.
    ///
    /// Zero or negative when the boxes touch or overlap.
    pub fn gap_to(&self, other: &Bounds) -> f64 {
        let overlap = overlap(self, other);
        (-overlap.width).max(-overlap.height)
    }
}

/// Extent of the intersection of two boxes.
///
/// Non-positive values mean the boxes are disjoint (or merely touching) on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub width: f64,
    pub height: f64,
}

impl Overlap {
    /// True when both axes exceed `tolerance`
    pub fn exceeds(&self, tolerance: f64) -> bool {
        self.width > tolerance && self.height > tolerance
    }
}

/// Overlap rectangle of two bounding boxes
pub fn overlap(a: &Bounds, b: &Bounds) -> Overlap {
    Overlap {
        width: a.right.min(b.right) - a.left.max(b.left),
        height: a.bottom.min(b.bottom) - a.top.max(b.top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_disjoint() {
        let a = Bounds::new(0.0, 10.0, 0.0, 10.0);
        let b = Bounds::new(20.0, 30.0, 0.0, 10.0);
        let o = overlap(&a, &b);
        assert_eq!(o.width, -10.0);
        assert_eq!(o.height, 10.0);
        assert!(!o.exceeds(0.0));
    }

    #[test]
    fn test_overlap_touching_is_zero() {
        let a = Bounds::new(0.0, 10.0, 0.0, 10.0);
        let b = Bounds::new(10.0, 20.0, 0.0, 10.0);
        assert_eq!(overlap(&a, &b).width, 0.0);
        assert!(!overlap(&a, &b).exceeds(0.0));
    }

    #[test]
    fn test_overlap_partial() {
        let a = Bounds::new(0.0, 10.0, 0.0, 10.0);
        let b = Bounds::new(6.0, 16.0, 3.0, 13.0);
        let o = overlap(&a, &b);
        assert_eq!(o, Overlap { width: 4.0, height: 7.0 });
        assert!(o.exceeds(3.0));
        assert!(!o.exceeds(4.0));
    }

    #[test]
    fn test_gap_to() {
        let a = Bounds::new(0.0, 10.0, 0.0, 10.0);
        let b = Bounds::new(14.0, 20.0, 2.0, 8.0);
        assert_eq!(a.gap_to(&b), 4.0);
        let touching = Bounds::new(10.0, 20.0, 0.0, 10.0);
        assert_eq!(a.gap_to(&touching), 0.0);
    }

    #[test]
    fn test_enclosing_and_union() {
        let b = Bounds::enclosing([Point::new(3.0, 4.0), Point::new(-1.0, 8.0)]).unwrap();
        assert_eq!(b, Bounds::new(-1.0, 3.0, 4.0, 8.0));
        assert!(Bounds::enclosing(std::iter::empty()).is_none());

        let u = b.union(&Bounds::new(0.0, 10.0, 0.0, 1.0));
        assert_eq!(u, Bounds::new(-1.0, 10.0, 0.0, 8.0));
        assert_eq!(u.center(), Point::new(4.5, 4.0));
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(r.center(), Point::new(30.0, 50.0));
        assert_eq!(r.unrotated_bounds(), Bounds::new(10.0, 50.0, 20.0, 80.0));
    }
}
