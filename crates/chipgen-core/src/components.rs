//! The rectangle record every stage of generation produces and consumes.

use serde::{Deserialize, Serialize};

/// A rectangular component in the layout, stored as center + size.
///
/// Components are plain values: splitting a parent discards it and returns
/// fresh children, so a component's shape never changes after creation
/// (padding, which shrinks dimensions in place, is the one post-processing
/// exception).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Center x coordinate.
    pub x: f64,
    /// Center y coordinate.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Recursion depth; 0 for roots.
    pub level: u32,
    /// Lineage id shared by all descendants of one root rectangle.
    pub group_id: u32,
    /// Name of the rule that produced this rectangle ("hold" for roots).
    pub generate_rule: String,
    /// True when the last split that produced this rectangle was a
    /// symmetry-preserving rule.
    pub symmetric: bool,
    /// Pairs the two members of one mirror/centroid unit; -1 when unpaired.
    pub symmetric_group_id: i32,
}

impl Component {
    /// A fresh root rectangle (level 0, unsplit, no symmetry).
    pub fn new(x: f64, y: f64, width: f64, height: f64, group_id: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            level: 0,
            group_id,
            generate_rule: "hold".to_string(),
            symmetric: false,
            symmetric_group_id: -1,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_rule(mut self, rule: &str) -> Self {
        self.generate_rule = rule.to_string();
        self
    }

    /// A child rectangle produced from this parent by `rule`.
    ///
    /// Lineage fields are fixed at creation: `level + 1`, inherited
    /// `group_id`. Symmetry is rule-local, so children start unmarked.
    pub fn child(&self, x: f64, y: f64, width: f64, height: f64, rule: &str) -> Self {
        Self {
            x,
            y,
            width,
            height,
            level: self.level + 1,
            group_id: self.group_id,
            generate_rule: rule.to_string(),
            symmetric: false,
            symmetric_group_id: -1,
        }
    }

    /// Bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        (self.x - hw, self.y - hh, self.x + hw, self.y + hh)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Ratio of the long side to the short side; infinite for degenerate
    /// rectangles so the aspect gate always rejects them.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return f64::INFINITY;
        }
        if self.width > self.height {
            self.width / self.height
        } else {
            self.height / self.width
        }
    }

    /// Strict AABB overlap: true iff the projections intersect on both axes.
    /// Touching edges count as intersecting.
    pub fn overlaps(&self, other: &Component) -> bool {
        let (ax1, ay1, ax2, ay2) = self.bounds();
        let (bx1, by1, bx2, by2) = other.bounds();
        ax2 >= bx1 && bx2 >= ax1 && ay2 >= by1 && by2 >= ay1
    }

    /// True when `(px, py)` lies inside the rectangle, with a small epsilon
    /// tolerance on the boundary.
    pub fn contains_point(&self, px: f64, py: f64, eps: f64) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        px >= min_x - eps && px <= max_x + eps && py >= min_y - eps && py <= max_y + eps
    }
}
