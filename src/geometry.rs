//! Canvas-local geometry: points, axis-aligned rectangles and resize anchors.
//!
//! Rectangles stored in the layout live on a fixed grid (`GRID_STEPS_PER_UNIT`
//! steps per unit). Translation snaps both the delta and the result, so a
//! drag followed by its inverse lands exactly where it started.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::GRID_STEPS_PER_UNIT;

/// Round `v` to the nearest grid step. Non-finite values pass through.
#[must_use]
pub fn snap(v: f64) -> f64 {
    (v * GRID_STEPS_PER_UNIT).round() / GRID_STEPS_PER_UNIT
}

/// A point in canvas-local units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> Delta {
        Delta { dx: self.x - other.x, dy: self.y - other.y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A translation in canvas-local units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// The delta that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self { dx: -self.dx, dy: -self.dy }
    }

    /// Length of the delta vector.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Axis-aligned bounding box. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// This rectangle with every component snapped to the grid.
    #[must_use]
    pub fn snapped(&self) -> Self {
        Self { x: snap(self.x), y: snap(self.y), width: snap(self.width), height: snap(self.height) }
    }

    /// Same size, shifted by `delta`, snapped to the grid.
    #[must_use]
    pub fn translated(&self, delta: Delta) -> Self {
        Self { x: self.x + snap(delta.dx), y: self.y + snap(delta.dy), ..*self }.snapped()
    }

    /// Resize to `width` x `height`, keeping the edges opposite `anchor` fixed.
    /// The result is snapped to the grid.
    #[must_use]
    pub fn resized(&self, width: f64, height: f64, anchor: ResizeAnchor) -> Self {
        let x = if anchor.moves_left_edge() { self.right() - width } else { self.x };
        let y = if anchor.moves_top_edge() { self.bottom() - height } else { self.y };
        Self { x, y, width, height }.snapped()
    }

    /// Whether `pt` lies inside or on the edge of this rectangle.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Whether the interiors of the two rectangles overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Describe why this rectangle is unusable, or `None` when it is valid.
    ///
    /// Coordinates must be finite and both dimensions at least `min_size`
    /// (and always strictly positive).
    #[must_use]
    pub fn defect(&self, min_size: f64) -> Option<String> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Some("position must be finite".into());
        }
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Some("size must be finite".into());
        }
        if self.width <= 0.0 || self.width < min_size {
            return Some(format!("width {} below minimum {min_size}", self.width));
        }
        if self.height <= 0.0 || self.height < min_size {
            return Some(format!("height {} below minimum {min_size}", self.height));
        }
        None
    }
}

/// Resize handle being dragged. The opposite edge or corner stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    fn moves_left_edge(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    fn moves_right_edge(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    fn moves_bottom_edge(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// Where this handle sits on `rect`.
    #[must_use]
    pub fn handle_point(self, rect: &Rect) -> Point {
        let x = if self.moves_left_edge() {
            rect.x
        } else if self.moves_right_edge() {
            rect.right()
        } else {
            rect.x + rect.width / 2.0
        };
        let y = if self.moves_top_edge() {
            rect.y
        } else if self.moves_bottom_edge() {
            rect.bottom()
        } else {
            rect.y + rect.height / 2.0
        };
        Point::new(x, y)
    }

    /// Size produced by dragging this handle of `orig` by `delta`.
    ///
    /// Edge handles leave the perpendicular dimension unchanged. The result
    /// is not clamped; callers validate it.
    #[must_use]
    pub fn dragged_size(self, orig: &Rect, delta: Delta) -> (f64, f64) {
        let width = if self.moves_right_edge() {
            orig.width + delta.dx
        } else if self.moves_left_edge() {
            orig.width - delta.dx
        } else {
            orig.width
        };
        let height = if self.moves_bottom_edge() {
            orig.height + delta.dy
        } else if self.moves_top_edge() {
            orig.height - delta.dy
        } else {
            orig.height
        };
        (width, height)
    }
}
