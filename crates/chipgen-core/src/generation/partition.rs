//! Depth-bounded recursive partitioning.
//!
//! Each open rectangle draws a weighted rule, applies it with every child
//! kept, and recurses into the children. A rectangle at the depth bound, or
//! one whose draw degraded to a no-op, is emitted as a leaf.

use rand::Rng;

use crate::components::Component;
use crate::config::GenerationConfig;
use crate::rules::{RuleError, SplitSpec};
use crate::selector::{KeepMode, RuleSelector};

/// Recursively partition `component` down to `max_depth`, returning the
/// leaf frontier in generation order.
///
/// `sym_counter` hands out symmetry-pair ids; it must be shared across all
/// partition calls of one generation run so ids stay unique.
pub fn partition_recursive(
    component: &Component,
    selector: &RuleSelector,
    cfg: &GenerationConfig,
    max_depth: u32,
    sym_counter: &mut i32,
    rng: &mut impl Rng,
) -> Result<Vec<Component>, RuleError> {
    if component.level >= max_depth {
        return Ok(vec![component.clone()]);
    }

    let kind = selector.choose(rng);
    let spec = SplitSpec::sample(kind, cfg.component_gap, rng);
    let mut children = selector.apply(
        component,
        &spec,
        KeepMode::KeepAll,
        cfg.max_aspect_ratio,
        rng,
    )?;

    // a no-op terminates the branch; the rectangle is final as-is
    if children.len() <= 1 {
        return Ok(children);
    }

    if kind.is_symmetric() {
        for &(a, b) in kind.symmetry_pairs() {
            let pair_id = *sym_counter;
            *sym_counter += 1;
            children[a].symmetric_group_id = pair_id;
            children[b].symmetric_group_id = pair_id;
        }
    }

    let mut leaves = Vec::new();
    for child in &children {
        leaves.extend(partition_recursive(
            child,
            selector,
            cfg,
            max_depth,
            sym_counter,
            rng,
        )?);
    }
    Ok(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(seed: u64, max_depth: u32) -> Vec<Component> {
        let cfg = GenerationConfig::default();
        let selector = RuleSelector::new();
        let root = Component::new(1.0, 1.0, 1.5, 1.5, 0);
        let mut sym_counter = 0;
        let mut rng = StdRng::seed_from_u64(seed);
        partition_recursive(&root, &selector, &cfg, max_depth, &mut sym_counter, &mut rng)
            .unwrap()
    }

    #[test]
    fn test_leaf_levels_bounded() {
        for seed in 0..20 {
            for leaf in run(seed, 4) {
                assert!(leaf.level <= 4, "leaf at level {}", leaf.level);
            }
        }
    }

    #[test]
    fn test_group_id_propagates() {
        for leaf in run(7, 3) {
            assert_eq!(leaf.group_id, 0);
        }
    }

    #[test]
    fn test_leaves_never_overlap() {
        for seed in 0..20 {
            let leaves = run(seed, 5);
            for i in 0..leaves.len() {
                for j in (i + 1)..leaves.len() {
                    assert!(
                        !leaves[i].overlaps(&leaves[j]),
                        "seed {} produced overlapping leaves {} and {}",
                        seed,
                        i,
                        j
                    );
                }
            }
        }
    }

    #[test]
    fn test_aspect_bound_holds_on_every_leaf() {
        let cfg = GenerationConfig::default();
        for seed in 0..20 {
            for leaf in run(seed, 5) {
                assert!(leaf.aspect_ratio() <= cfg.max_aspect_ratio + 1e-9);
            }
        }
    }

    #[test]
    fn test_symmetric_leaves_carry_pair_ids() {
        use std::collections::HashMap;
        // many seeds so at least some runs commit symmetric rules
        let mut saw_pair = false;
        for seed in 0..40 {
            let leaves = run(seed, 3);
            let mut groups: HashMap<i32, Vec<&Component>> = HashMap::new();
            for leaf in &leaves {
                if leaf.symmetric_group_id >= 0 {
                    groups.entry(leaf.symmetric_group_id).or_default().push(leaf);
                }
            }
            for (gid, members) in &groups {
                assert!(
                    members.len() <= 2,
                    "seed {} pair {} has {} members",
                    seed,
                    gid,
                    members.len()
                );
                if members.len() == 2 {
                    saw_pair = true;
                    assert!(members[0].symmetric && members[1].symmetric);
                    assert!((members[0].width - members[1].width).abs() < 1e-9);
                    assert!((members[0].height - members[1].height).abs() < 1e-9);
                }
            }
        }
        assert!(saw_pair, "no symmetric pair survived in 40 runs");
    }

    #[test]
    fn test_zero_depth_returns_root() {
        let leaves = run(1, 0);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].level, 0);
    }
}
