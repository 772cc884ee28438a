//! Map-space geometry shared by the tilemap, collision and door code
//!
//! All coordinates are map pixels with the origin at the top-left corner and
//! `y` growing downwards:
//! - `Rect` - Axis-aligned rectangle (`f32`, sub-pixel precision)
//! - `Axis` - Horizontal or vertical, for per-axis collision resolution

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in map pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its min and max corners
    pub fn from_corners(min: [f32; 2], max: [f32; 2]) -> Self {
        Self::new(min[0], min[1], max[0] - min[0], max[1] - min[1])
    }

    /// Create a square box anchored at `position` (top-left)
    pub fn square(position: [f32; 2], size: f32) -> Self {
        Self::new(position[0], position[1], size, size)
    }

    /// Top-left corner
    pub fn min(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Bottom-right corner
    pub fn max(&self) -> [f32; 2] {
        [self.x + self.width, self.y + self.height]
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.width / 2.0, self.y + self.height / 2.0]
    }

    /// Lower bound on the given axis
    pub fn min_on(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Upper bound on the given axis
    pub fn max_on(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x + self.width,
            Axis::Vertical => self.y + self.height,
        }
    }

    /// Check whether the two rectangles share a region of non-zero area
    ///
    /// Rectangles that only touch along an edge do not overlap, so a body
    /// resting flush against a wall is not considered colliding.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Check if the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis used for sequential collision resolution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Index of this axis into an `[x, y]` pair
    pub fn index(&self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let rect = Rect::from_corners([100.0, 100.0], [116.0, 120.0]);
        assert_eq!(rect.width, 16.0);
        assert_eq!(rect.height, 20.0);
        assert_eq!(rect.max(), [116.0, 120.0]);
        assert_eq!(rect.center(), [108.0, 110.0]);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let wall = Rect::new(100.0, 100.0, 16.0, 16.0);
        let left = Rect::square([84.0, 100.0], 16.0);
        let below = Rect::square([100.0, 116.0], 16.0);
        assert!(!wall.overlaps(&left));
        assert!(!wall.overlaps(&below));

        let inside = Rect::square([98.0, 100.0], 16.0);
        assert!(wall.overlaps(&inside));
        assert!(inside.overlaps(&wall));
    }

    #[test]
    fn test_axis_bounds() {
        let rect = Rect::new(10.0, 20.0, 5.0, 6.0);
        assert_eq!(rect.min_on(Axis::Horizontal), 10.0);
        assert_eq!(rect.max_on(Axis::Horizontal), 15.0);
        assert_eq!(rect.min_on(Axis::Vertical), 20.0);
        assert_eq!(rect.max_on(Axis::Vertical), 26.0);
        assert_eq!(Axis::Vertical.index(), 1);
    }
}
