//! Symmetry-preserving splits: mirrored quadrants, common-centroid
//! quadrants, and symmetric triplets.
//!
//! Committed children of these rules are marked `symmetric` by the catalog
//! dispatch and paired into symmetry units by the partitioner; the count
//! reconciler refuses to merge or force-split them.

use crate::components::Component;

use super::basic::{split_horizontal, split_vertical};
use super::within_aspect;

fn adopt(parent: &Component, children: Vec<Component>, rule: &str) -> Vec<Component> {
    children
        .into_iter()
        .map(|c| Component {
            level: parent.level + 1,
            generate_rule: rule.to_string(),
            ..c
        })
        .collect()
}

/// Halve the width, then split each half horizontally with complementary
/// ratios so diagonal children are congruent.
///
/// Returns `[top-left, bottom-left, bottom-right, top-right]`; the whole
/// split is a no-op unless all four children validate.
pub fn split_mirrored_vertical(
    c: &Component,
    ratio_h: f64,
    gap: f64,
    max_aspect: f64,
) -> Vec<Component> {
    if c.width <= gap || c.height <= 2.0 * gap {
        return vec![c.clone()];
    }
    let halves = split_vertical(c, 0.5, gap, max_aspect);
    if halves.len() < 2 {
        return vec![c.clone()];
    }
    let left = split_horizontal(&halves[0], ratio_h, gap, max_aspect);
    let right = split_horizontal(&halves[1], 1.0 - ratio_h, gap, max_aspect);
    if left.len() < 2 || right.len() < 2 {
        return vec![c.clone()];
    }
    adopt(
        c,
        vec![
            left[1].clone(),
            left[0].clone(),
            right[0].clone(),
            right[1].clone(),
        ],
        "mirrored_vertical",
    )
}

/// Halve the height, then split each half vertically with complementary
/// ratios so diagonal children are congruent.
///
/// Returns `[top-left, top-right, bottom-left, bottom-right]`.
pub fn split_mirrored_horizontal(
    c: &Component,
    ratio_v: f64,
    gap: f64,
    max_aspect: f64,
) -> Vec<Component> {
    if c.height <= gap || c.width <= 2.0 * gap {
        return vec![c.clone()];
    }
    let halves = split_horizontal(c, 0.5, gap, max_aspect);
    if halves.len() < 2 {
        return vec![c.clone()];
    }
    let top = split_vertical(&halves[1], ratio_v, gap, max_aspect);
    let bottom = split_vertical(&halves[0], 1.0 - ratio_v, gap, max_aspect);
    if top.len() < 2 || bottom.len() < 2 {
        return vec![c.clone()];
    }
    adopt(
        c,
        vec![
            top[0].clone(),
            top[1].clone(),
            bottom[0].clone(),
            bottom[1].clone(),
        ],
        "mirrored_horizontal",
    )
}

/// Quadrants forced to 0.5/0.5: four congruent children in point symmetry.
///
/// Returns `[left-bottom, left-top, right-bottom, right-top]`; no-op unless
/// all four commit.
pub fn split_common_centroid(c: &Component, gap: f64, max_aspect: f64) -> Vec<Component> {
    let halves = split_vertical(c, 0.5, gap, max_aspect);
    if halves.len() < 2 {
        return vec![c.clone()];
    }
    let mut quads = Vec::with_capacity(4);
    for half in &halves {
        let parts = split_horizontal(half, 0.5, gap, max_aspect);
        if parts.len() < 2 {
            return vec![c.clone()];
        }
        quads.extend(parts);
    }
    adopt(c, quads, "common_centroid")
}

/// Split the width into two congruent outer parts of proportion `ratio_w`
/// each and a center part taking the remainder.
///
/// Returns `[left, center, right]`; `ratio_w` must be in the open interval
/// (0, 0.5), else no-op.
pub fn split_triplet_vertical(
    c: &Component,
    ratio_w: f64,
    gap: f64,
    max_aspect: f64,
) -> Vec<Component> {
    if ratio_w <= 0.0 || ratio_w >= 0.5 {
        return vec![c.clone()];
    }
    let total_gap = 2.0 * gap;
    if c.width <= total_gap {
        return vec![c.clone()];
    }
    let w_side = (c.width - total_gap) * ratio_w;
    let w_center = (c.width - total_gap) * (1.0 - 2.0 * ratio_w);
    if w_side <= 0.0 || w_center <= 0.0 {
        return vec![c.clone()];
    }
    let left_edge = c.x - c.width / 2.0;
    let children = vec![
        c.child(
            left_edge + w_side / 2.0,
            c.y,
            w_side,
            c.height,
            "triplet_vertical",
        ),
        c.child(
            left_edge + w_side + gap + w_center / 2.0,
            c.y,
            w_center,
            c.height,
            "triplet_vertical",
        ),
        c.child(
            left_edge + w_side + gap + w_center + gap + w_side / 2.0,
            c.y,
            w_side,
            c.height,
            "triplet_vertical",
        ),
    ];
    if !within_aspect(&children, max_aspect) {
        return vec![c.clone()];
    }
    children
}

/// Vertical-axis analog of [`split_triplet_vertical`]: two congruent outer
/// parts along the height. Returns `[bottom, center, top]`.
pub fn split_triplet_horizontal(
    c: &Component,
    ratio_h: f64,
    gap: f64,
    max_aspect: f64,
) -> Vec<Component> {
    if ratio_h <= 0.0 || ratio_h >= 0.5 {
        return vec![c.clone()];
    }
    let total_gap = 2.0 * gap;
    if c.height <= total_gap {
        return vec![c.clone()];
    }
    let h_side = (c.height - total_gap) * ratio_h;
    let h_center = (c.height - total_gap) * (1.0 - 2.0 * ratio_h);
    if h_side <= 0.0 || h_center <= 0.0 {
        return vec![c.clone()];
    }
    let bottom_edge = c.y - c.height / 2.0;
    let children = vec![
        c.child(
            c.x,
            bottom_edge + h_side / 2.0,
            c.width,
            h_side,
            "triplet_horizontal",
        ),
        c.child(
            c.x,
            bottom_edge + h_side + gap + h_center / 2.0,
            c.width,
            h_center,
            "triplet_horizontal",
        ),
        c.child(
            c.x,
            bottom_edge + h_side + gap + h_center + gap + h_side / 2.0,
            c.width,
            h_side,
            "triplet_horizontal",
        ),
    ];
    if !within_aspect(&children, max_aspect) {
        return vec![c.clone()];
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_ASPECT: f64 = 8.0;

    fn unit() -> Component {
        Component::new(0.0, 0.0, 1.0, 1.0, 0)
    }

    fn congruent(a: &Component, b: &Component) -> bool {
        (a.width - b.width).abs() < 1e-9 && (a.height - b.height).abs() < 1e-9
    }

    #[test]
    fn test_mirrored_vertical_diagonal_congruence() {
        let children = split_mirrored_vertical(&unit(), 0.4, 0.01, MAX_ASPECT);
        assert_eq!(children.len(), 4);
        // order [TL, BL, BR, TR]
        assert!(congruent(&children[0], &children[2]));
        assert!(congruent(&children[1], &children[3]));
        assert!(!congruent(&children[0], &children[1]));
        for child in &children {
            assert_eq!(child.level, 1);
            assert_eq!(child.generate_rule, "mirrored_vertical");
        }
    }

    #[test]
    fn test_mirrored_horizontal_diagonal_congruence() {
        let children = split_mirrored_horizontal(&unit(), 0.35, 0.01, MAX_ASPECT);
        assert_eq!(children.len(), 4);
        // order [TL, TR, BL, BR]
        assert!(congruent(&children[0], &children[3]));
        assert!(congruent(&children[1], &children[2]));
    }

    #[test]
    fn test_mirrored_no_op_propagates() {
        let thin = Component::new(0.0, 0.0, 0.005, 1.0, 0);
        assert_eq!(split_mirrored_vertical(&thin, 0.4, 0.01, MAX_ASPECT).len(), 1);
    }

    #[test]
    fn test_common_centroid_four_congruent() {
        let children = split_common_centroid(&unit(), 0.01, MAX_ASPECT);
        assert_eq!(children.len(), 4);
        for child in &children[1..] {
            assert!(congruent(&children[0], child));
        }
    }

    #[test]
    fn test_triplet_vertical_geometry() {
        let children = split_triplet_vertical(&unit(), 0.25, 0.02, MAX_ASPECT);
        assert_eq!(children.len(), 3);
        assert!((children[0].width - 0.24).abs() < 1e-9);
        assert!((children[1].width - 0.48).abs() < 1e-9);
        assert!((children[2].width - 0.24).abs() < 1e-9);
        // outer pair congruent, widths plus gaps reconstruct the parent
        let total = children[0].width + children[1].width + children[2].width + 2.0 * 0.02;
        assert!((total - 1.0).abs() < 1e-9);
        for i in 0..children.len() {
            for j in (i + 1)..children.len() {
                assert!(!children[i].overlaps(&children[j]));
            }
        }
    }

    #[test]
    fn test_triplet_rejects_out_of_range_ratio() {
        assert_eq!(split_triplet_vertical(&unit(), 0.5, 0.02, MAX_ASPECT).len(), 1);
        assert_eq!(split_triplet_vertical(&unit(), 0.0, 0.02, MAX_ASPECT).len(), 1);
        assert_eq!(split_triplet_horizontal(&unit(), 0.6, 0.02, MAX_ASPECT).len(), 1);
    }

    #[test]
    fn test_triplet_aspect_gate_is_all_or_nothing() {
        // outer slivers at ratio 0.05 have aspect ~20; everything no-ops
        let children = split_triplet_vertical(&unit(), 0.05, 0.01, MAX_ASPECT);
        assert_eq!(children.len(), 1);
    }
}
