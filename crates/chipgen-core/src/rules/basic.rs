//! Basic axis-aligned splits: vertical, horizontal, quadrants.

use crate::components::Component;

use super::within_aspect;

/// Split the width at `ratio`, leaving `gap` between the halves.
///
/// No-op when either child would have a non-positive width or break the
/// aspect bound.
pub fn split_vertical(c: &Component, ratio: f64, gap: f64, max_aspect: f64) -> Vec<Component> {
    if c.width <= gap {
        return vec![c.clone()];
    }
    let w1 = c.width * ratio - gap / 2.0;
    let w2 = c.width * (1.0 - ratio) - gap / 2.0;
    if w1 <= 0.0 || w2 <= 0.0 {
        return vec![c.clone()];
    }
    let left = c.x - c.width / 2.0;
    let children = vec![
        c.child(left + w1 / 2.0, c.y, w1, c.height, "vertical"),
        c.child(left + w1 + gap + w2 / 2.0, c.y, w2, c.height, "vertical"),
    ];
    if !within_aspect(&children, max_aspect) {
        return vec![c.clone()];
    }
    children
}

/// Split the height at `ratio`, leaving `gap` between the halves.
pub fn split_horizontal(c: &Component, ratio: f64, gap: f64, max_aspect: f64) -> Vec<Component> {
    if c.height <= gap {
        return vec![c.clone()];
    }
    let h1 = c.height * ratio - gap / 2.0;
    let h2 = c.height * (1.0 - ratio) - gap / 2.0;
    if h1 <= 0.0 || h2 <= 0.0 {
        return vec![c.clone()];
    }
    let bottom = c.y - c.height / 2.0;
    let children = vec![
        c.child(c.x, bottom + h1 / 2.0, c.width, h1, "horizontal"),
        c.child(c.x, bottom + h1 + gap + h2 / 2.0, c.width, h2, "horizontal"),
    ];
    if !within_aspect(&children, max_aspect) {
        return vec![c.clone()];
    }
    children
}

/// Vertical split, then a horizontal split of each half.
///
/// A half whose horizontal split is infeasible stays intact, so the result
/// has 2 to 4 children. When the vertical split itself is infeasible the
/// whole rule is a no-op.
pub fn split_quadrants(
    c: &Component,
    ratio_v: f64,
    ratio_h: f64,
    gap: f64,
    max_aspect: f64,
) -> Vec<Component> {
    let halves = split_vertical(c, ratio_v, gap, max_aspect);
    if halves.len() < 2 {
        return halves;
    }
    let mut quads = Vec::with_capacity(4);
    for half in &halves {
        quads.extend(split_horizontal(half, ratio_h, gap, max_aspect));
    }
    // the composition is one split: children sit one level below the parent
    quads
        .into_iter()
        .map(|q| Component {
            level: c.level + 1,
            generate_rule: "quadrants".to_string(),
            ..q
        })
        .collect()
}
