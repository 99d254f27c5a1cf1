//! Synthetic netlist edges: absolute pin-to-pin connections between leaf
//! components, consumed by the ML export.

use rand::Rng;

use crate::components::Component;

/// One absolute connection: `[[src_x, src_y], [dst_x, dst_y]]`.
pub type NetlistEdge = [[f64; 2]; 2];

/// A random pin strictly interior to the rectangle.
///
/// Pins stay inside 80% of each half-extent so that even with the epsilon
/// tolerance of downstream containment tests a pin resolves to exactly one
/// leaf.
fn pin_inside(c: &Component, rng: &mut impl Rng) -> [f64; 2] {
    let hx = 0.4 * c.width;
    let hy = 0.4 * c.height;
    [
        rng.gen_range(c.x - hx..=c.x + hx),
        rng.gen_range(c.y - hy..=c.y + hy),
    ]
}

/// Draw `count` edges between distinct random leaves. Fewer than two
/// leaves yields no edges.
pub fn synthesize_edges(
    leaves: &[Component],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<NetlistEdge> {
    if leaves.len() < 2 {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let src = rng.gen_range(0..leaves.len());
            let mut dst = rng.gen_range(0..leaves.len() - 1);
            if dst >= src {
                dst += 1;
            }
            [pin_inside(&leaves[src], rng), pin_inside(&leaves[dst], rng)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pins_land_inside_their_leaf() {
        let leaves = vec![
            Component::new(0.0, 0.0, 0.4, 0.4, 0),
            Component::new(1.0, 0.0, 0.4, 0.4, 0),
            Component::new(0.0, 1.0, 0.4, 0.4, 0),
        ];
        let mut rng = StdRng::seed_from_u64(8);
        let edges = synthesize_edges(&leaves, 50, &mut rng);
        assert_eq!(edges.len(), 50);
        for edge in &edges {
            for pin in edge {
                let owners = leaves
                    .iter()
                    .filter(|l| l.contains_point(pin[0], pin[1], 1e-6))
                    .count();
                assert_eq!(owners, 1);
            }
        }
    }

    #[test]
    fn test_edge_endpoints_are_distinct_leaves() {
        let leaves = vec![
            Component::new(0.0, 0.0, 0.4, 0.4, 0),
            Component::new(1.0, 0.0, 0.4, 0.4, 0),
        ];
        let mut rng = StdRng::seed_from_u64(8);
        for edge in synthesize_edges(&leaves, 20, &mut rng) {
            let src_owner = leaves
                .iter()
                .position(|l| l.contains_point(edge[0][0], edge[0][1], 1e-6));
            let dst_owner = leaves
                .iter()
                .position(|l| l.contains_point(edge[1][0], edge[1][1], 1e-6));
            assert_ne!(src_owner, dst_owner);
        }
    }

    #[test]
    fn test_single_leaf_yields_no_edges() {
        let leaves = vec![Component::new(0.0, 0.0, 0.4, 0.4, 0)];
        let mut rng = StdRng::seed_from_u64(8);
        assert!(synthesize_edges(&leaves, 10, &mut rng).is_empty());
    }
}
