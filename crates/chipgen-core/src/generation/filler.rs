//! Filler placement: drop independent rectangles into the free space left
//! by the center partition, then partition each to a shallow random depth.

use rand::Rng;

use crate::components::Component;
use crate::config::GenerationConfig;
use crate::rules::RuleError;
use crate::selector::RuleSelector;

use super::partition::partition_recursive;
use super::Diagnostic;

/// Search for one non-overlapping filler position inside `region`.
///
/// Samples a size from the filler range and a center position that keeps
/// the rectangle fully inside the region, rejecting any candidate whose
/// AABB intersects an already-placed rectangle. Returns `None` when the
/// retry budget is exhausted.
pub fn try_place(
    placed: &[Component],
    region: &Component,
    cfg: &GenerationConfig,
    rng: &mut impl Rng,
) -> Option<Component> {
    let (min_x, min_y, max_x, max_y) = region.bounds();
    let (size_lo, size_hi) = cfg.filler_size_range;

    for _ in 0..cfg.placement_retry_limit {
        let width = rng.gen_range(size_lo..=size_hi);
        let height = rng.gen_range(size_lo..=size_hi);
        if width > max_x - min_x || height > max_y - min_y {
            continue;
        }
        let x = rng.gen_range(min_x + width / 2.0..=max_x - width / 2.0);
        let y = rng.gen_range(min_y + height / 2.0..=max_y - height / 2.0);
        let candidate = Component::new(x, y, width, height, 0);
        if placed.iter().all(|c| !candidate.overlaps(c)) {
            return Some(candidate);
        }
    }
    None
}

/// Fill up to `num_filler_components` slots, appending every accepted
/// filler's partition leaves to `placed`.
///
/// Each accepted filler becomes a fresh root (`*next_group`, incremented)
/// and is partitioned to a random depth in `[0, max_filler_depth]`. A slot
/// whose placement search fails is skipped with a diagnostic; generation
/// continues with the remaining slots.
#[allow(clippy::too_many_arguments)]
pub fn place_fillers(
    placed: &mut Vec<Component>,
    region: &Component,
    selector: &RuleSelector,
    cfg: &GenerationConfig,
    next_group: &mut u32,
    sym_counter: &mut i32,
    rng: &mut impl Rng,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), RuleError> {
    for slot in 0..cfg.num_filler_components {
        let Some(candidate) = try_place(placed, region, cfg, rng) else {
            log::warn!(
                "no valid position for filler {} of {} after {} attempts",
                slot + 1,
                cfg.num_filler_components,
                cfg.placement_retry_limit
            );
            diagnostics.push(Diagnostic {
                category: "filler_placement",
                message: format!(
                    "filler slot {} abandoned after {} attempts",
                    slot + 1,
                    cfg.placement_retry_limit
                ),
            });
            continue;
        };

        let group_id = *next_group;
        *next_group += 1;
        let filler = Component { group_id, ..candidate };

        let depth = rng.gen_range(0..=cfg.max_filler_depth);
        if depth == 0 {
            placed.push(filler);
        } else {
            let leaves =
                partition_recursive(&filler, selector, cfg, depth, sym_counter, rng)?;
            placed.extend(leaves);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn region() -> Component {
        Component::new(1.0, 1.0, 1.5, 1.5, 0)
    }

    #[test]
    fn test_fillers_stay_inside_region_and_disjoint() {
        let cfg = GenerationConfig::default();
        let selector = RuleSelector::new();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut placed = Vec::new();
            let mut next_group = 1;
            let mut sym_counter = 0;
            let mut diagnostics = Vec::new();
            place_fillers(
                &mut placed,
                &region(),
                &selector,
                &cfg,
                &mut next_group,
                &mut sym_counter,
                &mut rng,
                &mut diagnostics,
            )
            .unwrap();
            assert!(!placed.is_empty());

            let (min_x, min_y, max_x, max_y) = region().bounds();
            for c in &placed {
                let (cx1, cy1, cx2, cy2) = c.bounds();
                assert!(cx1 >= min_x - 1e-9 && cx2 <= max_x + 1e-9);
                assert!(cy1 >= min_y - 1e-9 && cy2 <= max_y + 1e-9);
            }
            for i in 0..placed.len() {
                for j in (i + 1)..placed.len() {
                    assert!(!placed[i].overlaps(&placed[j]));
                }
            }
        }
    }

    #[test]
    fn test_filler_groups_are_fresh() {
        let cfg = GenerationConfig::default();
        let selector = RuleSelector::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut placed = vec![region().child(1.0, 1.0, 0.4, 0.4, "vertical")];
        let mut next_group = 5;
        let mut sym_counter = 0;
        let mut diagnostics = Vec::new();
        place_fillers(
            &mut placed,
            &region(),
            &selector,
            &cfg,
            &mut next_group,
            &mut sym_counter,
            &mut rng,
            &mut diagnostics,
        )
        .unwrap();
        for c in placed.iter().skip(1) {
            assert!(c.group_id >= 5);
        }
        assert!(next_group > 5);
    }

    #[test]
    fn test_crowded_region_degrades_with_diagnostic() {
        // region fully covered: every placement must fail, every slot is
        // skipped, nothing is appended
        let cfg = GenerationConfig {
            placement_retry_limit: 50,
            ..Default::default()
        };
        let selector = RuleSelector::new();
        let mut rng = StdRng::seed_from_u64(9);
        let blocker = region();
        let mut placed = vec![blocker];
        let mut next_group = 1;
        let mut sym_counter = 0;
        let mut diagnostics = Vec::new();
        place_fillers(
            &mut placed,
            &region(),
            &selector,
            &cfg,
            &mut next_group,
            &mut sym_counter,
            &mut rng,
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(diagnostics.len(), cfg.num_filler_components);
        assert_eq!(next_group, 1);
    }
}
