//! Count reconciliation: drive the leaf count to the sampled target after
//! filler placement, by placing, force-splitting, or merging rectangles.
//!
//! Symmetric rectangles are off-limits for both merging and forced splits;
//! when neither strategy can move the count the reconciler records a
//! diagnostic and leaves a best-effort count.

use rand::Rng;

use crate::components::Component;
use crate::config::GenerationConfig;
use crate::rules::basic::{split_horizontal, split_vertical};

use super::filler::try_place;
use super::Diagnostic;

/// Numeric tolerance for gap-adjacency and congruence tests.
const MERGE_TOL: f64 = 1e-6;

/// Adjust `components` toward exactly `target` members.
pub fn reconcile_count(
    components: &mut Vec<Component>,
    region: &Component,
    target: usize,
    cfg: &GenerationConfig,
    next_group: &mut u32,
    rng: &mut impl Rng,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if components.len() < target {
        grow_to_target(components, region, target, cfg, next_group, rng, diagnostics);
    } else if components.len() > target {
        merge_to_target(components, target, cfg, diagnostics);
    }
}

/// Below target: place one unsplit filler per round, falling back to a
/// forced split of the largest non-symmetric rectangle when placement
/// fails.
fn grow_to_target(
    components: &mut Vec<Component>,
    region: &Component,
    target: usize,
    cfg: &GenerationConfig,
    next_group: &mut u32,
    rng: &mut impl Rng,
    diagnostics: &mut Vec<Diagnostic>,
) {
    while components.len() < target {
        if let Some(candidate) = try_place(components, region, cfg, rng) {
            let group_id = *next_group;
            *next_group += 1;
            components.push(Component { group_id, ..candidate });
            continue;
        }
        if !force_split_one(components, cfg, rng) {
            log::warn!(
                "reconciliation stuck below target: {} of {} leaves",
                components.len(),
                target
            );
            diagnostics.push(Diagnostic {
                category: "reconcile",
                message: format!(
                    "no placement or splittable candidate left at {} of {} leaves",
                    components.len(),
                    target
                ),
            });
            return;
        }
    }
}

/// Split one eligible rectangle in place, trying candidates in descending
/// area order. Returns false when every candidate refuses to split.
fn force_split_one(
    components: &mut Vec<Component>,
    cfg: &GenerationConfig,
    rng: &mut impl Rng,
) -> bool {
    let gap = cfg.component_gap;
    let mut candidates: Vec<usize> = (0..components.len())
        .filter(|&i| {
            let c = &components[i];
            !c.symmetric && c.width > 2.0 * gap && c.height > 2.0 * gap
        })
        .collect();
    candidates.sort_by(|&a, &b| components[b].area().total_cmp(&components[a].area()));

    for &i in &candidates {
        let ratio = rng.gen_range(0.3..0.7);
        let mut children = split_vertical(&components[i], ratio, gap, cfg.max_aspect_ratio);
        if children.len() <= 1 {
            let ratio = rng.gen_range(0.3..0.7);
            children = split_horizontal(&components[i], ratio, gap, cfg.max_aspect_ratio);
        }
        if children.len() > 1 {
            components.remove(i);
            components.extend(children);
            return true;
        }
    }
    false
}

/// Above target: repeatedly merge the mergeable pair with the smallest
/// combined area until the count matches or no pair remains.
fn merge_to_target(
    components: &mut Vec<Component>,
    target: usize,
    cfg: &GenerationConfig,
    diagnostics: &mut Vec<Diagnostic>,
) {
    while components.len() > target {
        let Some((i, j)) =
            best_merge_pair(components, cfg.component_gap, cfg.max_aspect_ratio)
        else {
            log::warn!(
                "reconciliation stuck above target: {} of {} leaves, no mergeable pair",
                components.len(),
                target
            );
            diagnostics.push(Diagnostic {
                category: "reconcile",
                message: format!(
                    "no mergeable pair left at {} of {} leaves",
                    components.len(),
                    target
                ),
            });
            return;
        };
        let merged = merge_pair(&components[i], &components[j]);
        // j > i: remove the higher index first so i stays valid
        components.remove(j);
        components.remove(i);
        components.push(merged);
    }
}

/// Index pair (i < j) of the smallest-combined-area mergeable pair whose
/// union still honors the aspect bound.
fn best_merge_pair(
    components: &[Component],
    gap: f64,
    max_aspect: f64,
) -> Option<(usize, usize)> {
    let mut best: Option<(f64, usize, usize)> = None;
    for i in 0..components.len() {
        for j in (i + 1)..components.len() {
            let (a, b) = (&components[i], &components[j]);
            if a.symmetric || b.symmetric {
                continue;
            }
            if !mergeable(a, b, gap) {
                continue;
            }
            if merge_pair(a, b).aspect_ratio() > max_aspect {
                continue;
            }
            let combined = a.area() + b.area();
            let improves = match best {
                Some((best_area, _, _)) => combined < best_area,
                None => true,
            };
            if improves {
                best = Some((combined, i, j));
            }
        }
    }
    best.map(|(_, i, j)| (i, j))
}

/// True when the two rectangles sit exactly one gap apart on one axis and
/// are congruent and co-aligned on the other, so their union plus the gap
/// is itself a rectangle.
fn mergeable(a: &Component, b: &Component, gap: f64) -> bool {
    let (ax1, ay1, ax2, ay2) = a.bounds();
    let (bx1, by1, bx2, by2) = b.bounds();

    let x_adjacent =
        ((ax2 + gap) - bx1).abs() <= MERGE_TOL || ((bx2 + gap) - ax1).abs() <= MERGE_TOL;
    if x_adjacent
        && (a.height - b.height).abs() <= MERGE_TOL
        && (a.y - b.y).abs() <= MERGE_TOL
    {
        return true;
    }

    let y_adjacent =
        ((ay2 + gap) - by1).abs() <= MERGE_TOL || ((by2 + gap) - ay1).abs() <= MERGE_TOL;
    y_adjacent && (a.width - b.width).abs() <= MERGE_TOL && (a.x - b.x).abs() <= MERGE_TOL
}

/// Rectangle spanning both inputs plus the gap between them.
fn merge_pair(a: &Component, b: &Component) -> Component {
    let (ax1, ay1, ax2, ay2) = a.bounds();
    let (bx1, by1, bx2, by2) = b.bounds();
    let min_x = ax1.min(bx1);
    let min_y = ay1.min(by1);
    let max_x = ax2.max(bx2);
    let max_y = ay2.max(by2);

    Component {
        x: (min_x + max_x) / 2.0,
        y: (min_y + max_y) / 2.0,
        width: max_x - min_x,
        height: max_y - min_y,
        level: a.level.min(b.level),
        group_id: a.group_id.min(b.group_id),
        generate_rule: "merge".to_string(),
        symmetric: false,
        symmetric_group_id: -1,
    }
}
