//! Depth search: probe partition depths for the leaf count closest to the
//! sampled target.

use rand::Rng;

use crate::components::Component;
use crate::config::GenerationConfig;
use crate::rules::RuleError;
use crate::selector::RuleSelector;

use super::partition::partition_recursive;

/// Outcome of one depth search.
#[derive(Debug)]
pub struct DepthSearchResult {
    /// Depth of the kept trial.
    pub depth: u32,
    /// Leaf frontier of the kept trial.
    pub leaves: Vec<Component>,
    /// True when the kept trial hit the target exactly.
    pub exact: bool,
}

/// Probe depths `1..=max_search_depth` with a fresh stochastic partition of
/// `root` each time, keeping the first depth whose leaf count is closest to
/// `target`.
///
/// Stops early on an exact hit, and abandons deeper trials once a count
/// grossly overshoots the target range (1.5x its upper bound) since deeper
/// partitions only grow.
pub fn search_depth(
    root: &Component,
    selector: &RuleSelector,
    cfg: &GenerationConfig,
    target: usize,
    sym_counter: &mut i32,
    rng: &mut impl Rng,
) -> Result<DepthSearchResult, RuleError> {
    let overshoot_cap = (cfg.target_range.1 as f64 * 1.5) as usize;
    let mut best: Option<(usize, u32, Vec<Component>)> = None;

    for depth in 1..=cfg.max_search_depth {
        let leaves = partition_recursive(root, selector, cfg, depth, sym_counter, rng)?;
        let count = leaves.len();
        let distance = count.abs_diff(target);

        let improves = match &best {
            Some((best_distance, _, _)) => distance < *best_distance,
            None => true,
        };
        if improves {
            best = Some((distance, depth, leaves));
        }
        if distance == 0 {
            break;
        }
        if count > overshoot_cap {
            log::debug!(
                "depth search stopping at depth {depth}: {count} leaves overshoots cap {overshoot_cap}"
            );
            break;
        }
    }

    // config validation guarantees at least one trial; an untouched root
    // is the degenerate fallback
    let (distance, depth, leaves) = match best {
        Some(kept) => kept,
        None => (1usize.abs_diff(target), 0, vec![root.clone()]),
    };
    Ok(DepthSearchResult {
        depth,
        leaves,
        exact: distance == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn search(seed: u64, target: usize) -> DepthSearchResult {
        let cfg = GenerationConfig::default();
        let selector = RuleSelector::new();
        let root = Component::new(1.0, 1.0, 1.5, 1.5, 0);
        let mut sym_counter = 0;
        let mut rng = StdRng::seed_from_u64(seed);
        search_depth(&root, &selector, &cfg, target, &mut sym_counter, &mut rng).unwrap()
    }

    #[test]
    fn test_depth_within_configured_bound() {
        let cfg = GenerationConfig::default();
        for seed in 0..10 {
            let result = search(seed, 25);
            assert!(result.depth >= 1);
            assert!(result.depth <= cfg.max_search_depth);
        }
    }

    #[test]
    fn test_target_one_prefers_shallow_trials() {
        // a single-leaf result is always reachable when an early trial
        // no-ops, but any trial's distance to 1 is count - 1, so the kept
        // count can never be further from 1 than the depth-1 trial
        for seed in 0..10 {
            let result = search(seed, 1);
            assert!(result.leaves.len() >= 1);
        }
    }

    #[test]
    fn test_exact_flag_consistent_with_count() {
        for seed in 0..10 {
            let result = search(seed, 20);
            assert_eq!(result.exact, result.leaves.len() == 20);
        }
    }
}
