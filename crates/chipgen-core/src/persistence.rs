//! Export and persistence for finished layouts.
//!
//! Three consumers, three shapes:
//! - [`LayoutDocument`]: the JSON layout document downstream tooling reads
//!   (root dimensions, leaf records, absolute netlist edges);
//! - [`MlSample`]: the normalized, content-centered training sample the ML
//!   formatter derives from a document;
//! - a versioned bincode snapshot for compact dataset storage, written and
//!   read through caller-supplied `Write`/`Read` streams.

use std::collections::HashMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Component;
use crate::engine::Layout;
use crate::generation::netlist::NetlistEdge;

/// Snapshot format version; increment when the layout schema changes.
const SNAPSHOT_VERSION: u32 = 1;

/// Dimensions of the rectangle everything was generated inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootComponent {
    pub width: f64,
    pub height: f64,
}

/// The exchanged layout document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub root_component: RootComponent,
    pub final_leaf_components: Vec<Component>,
    pub netlist_edges: Vec<NetlistEdge>,
}

impl LayoutDocument {
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            root_component: RootComponent {
                width: layout.root.width,
                height: layout.root.height,
            },
            final_leaf_components: layout.leaves.clone(),
            netlist_edges: layout.edges.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ── ML-ready formatting ─────────────────────────────────────────────────

/// Edge groups of a training sample. Only basic component edges are
/// populated; alignment and grouping edges are reserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlEdges {
    pub basic_component_edge: Vec<([usize; 2], [f64; 4])>,
    pub align_edge: Vec<[usize; 2]>,
    pub group_edge: Vec<[usize; 2]>,
}

/// One nested rectangle of a node (always a single unit cell here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlSubComponent {
    pub offset: [f64; 2],
    pub dims: [f64; 2],
}

/// A normalized training sample derived from one layout document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlSample {
    /// Canvas-normalized `[width, height]` per leaf.
    pub node: Vec<[f64; 2]>,
    /// Content-centered, half-canvas-normalized `[x, y]` per leaf.
    pub target: Vec<[f64; 2]>,
    pub edges: MlEdges,
    pub sub_components: Vec<Vec<MlSubComponent>>,
    /// Leaf-index pairs related by a mirror/centroid rule.
    pub symmetry_groups: Vec<[usize; 2]>,
}

/// Index of the leaf containing the pin, with an epsilon boundary
/// tolerance. The first match wins; disjoint leaves make it unique.
fn find_parent_component(pin: [f64; 2], leaves: &[Component]) -> Option<usize> {
    leaves
        .iter()
        .position(|c| c.contains_point(pin[0], pin[1], 1e-6))
}

/// Convert a layout document into the normalized training-sample shape.
///
/// Positions are shifted so the content's bounding box is centered before
/// normalization; edges whose pins do not resolve to a leaf are skipped.
pub fn format_for_ml(doc: &LayoutDocument) -> MlSample {
    let leaves = &doc.final_leaf_components;
    let canvas_w = doc.root_component.width;
    let canvas_h = doc.root_component.height;

    let (content_cx, content_cy) = if leaves.is_empty() {
        (0.0, 0.0)
    } else {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for c in leaves {
            let (x1, y1, x2, y2) = c.bounds();
            min_x = min_x.min(x1);
            min_y = min_y.min(y1);
            max_x = max_x.max(x2);
            max_y = max_y.max(y2);
        }
        ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0)
    };

    let node = leaves
        .iter()
        .map(|c| [c.width / canvas_w, c.height / canvas_h])
        .collect();
    let target = leaves
        .iter()
        .map(|c| {
            [
                (c.x - content_cx) / (canvas_w / 2.0),
                (c.y - content_cy) / (canvas_h / 2.0),
            ]
        })
        .collect();
    let sub_components = leaves
        .iter()
        .map(|c| {
            vec![MlSubComponent {
                offset: [0.0, 0.0],
                dims: [c.width, c.height],
            }]
        })
        .collect();

    let mut basic_component_edge = Vec::new();
    for edge in &doc.netlist_edges {
        let (Some(src), Some(dst)) = (
            find_parent_component(edge[0], leaves),
            find_parent_component(edge[1], leaves),
        ) else {
            continue;
        };
        let src_comp = &leaves[src];
        let dst_comp = &leaves[dst];
        basic_component_edge.push((
            [src, dst],
            [
                (edge[0][0] - src_comp.x) / (canvas_w / 2.0),
                (edge[0][1] - src_comp.y) / (canvas_h / 2.0),
                (edge[1][0] - dst_comp.x) / (canvas_w / 2.0),
                (edge[1][1] - dst_comp.y) / (canvas_h / 2.0),
            ],
        ));
    }

    let mut groups: HashMap<i32, Vec<usize>> = HashMap::new();
    for (i, c) in leaves.iter().enumerate() {
        if c.symmetric_group_id >= 0 {
            groups.entry(c.symmetric_group_id).or_default().push(i);
        }
    }
    let mut symmetry_groups: Vec<[usize; 2]> = groups
        .into_values()
        .filter(|members| members.len() == 2)
        .map(|members| [members[0], members[1]])
        .collect();
    symmetry_groups.sort_unstable();

    MlSample {
        node,
        target,
        edges: MlEdges {
            basic_component_edge,
            align_edge: Vec::new(),
            group_edge: Vec::new(),
        },
        sub_components,
        symmetry_groups,
    }
}

// ── Binary snapshots ────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    document: LayoutDocument,
}

/// Anything that can go wrong writing or reading a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("snapshot serialization failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("unsupported snapshot version {0} (expected {SNAPSHOT_VERSION})")]
    Version(u32),
}

/// Write a versioned binary snapshot of the document.
pub fn save_layout<W: Write>(writer: W, document: &LayoutDocument) -> Result<(), PersistError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        document: document.clone(),
    };
    bincode::serialize_into(writer, &snapshot)?;
    Ok(())
}

/// Read a snapshot back, rejecting unknown versions.
pub fn load_layout<R: Read>(reader: R) -> Result<LayoutDocument, PersistError> {
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistError::Version(snapshot.version));
    }
    Ok(snapshot.document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> LayoutDocument {
        let mut left = Component::new(0.5, 1.0, 0.4, 0.4, 0);
        let mut right = Component::new(1.5, 1.0, 0.4, 0.4, 0);
        left.symmetric = true;
        left.symmetric_group_id = 0;
        right.symmetric = true;
        right.symmetric_group_id = 0;
        let lone = Component::new(1.0, 0.3, 0.2, 0.2, 1);
        LayoutDocument {
            root_component: RootComponent {
                width: 2.0,
                height: 2.0,
            },
            final_leaf_components: vec![left, right, lone],
            netlist_edges: vec![[[0.5, 1.0], [1.5, 1.0]], [[1.0, 0.3], [0.5, 1.0]]],
        }
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample_document();
        let json = doc.to_json().unwrap();
        let back = LayoutDocument::from_json(&json).unwrap();
        assert_eq!(back.final_leaf_components.len(), 3);
        assert_eq!(back.netlist_edges.len(), 2);
        assert!((back.root_component.width - 2.0).abs() < 1e-12);
        assert_eq!(back.final_leaf_components[0].symmetric_group_id, 0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let doc = sample_document();
        let mut buffer = Vec::new();
        save_layout(&mut buffer, &doc).unwrap();
        let back = load_layout(buffer.as_slice()).unwrap();
        assert_eq!(back.final_leaf_components.len(), 3);
        assert_eq!(
            back.final_leaf_components[1].generate_rule,
            doc.final_leaf_components[1].generate_rule
        );
    }

    #[test]
    fn test_snapshot_rejects_future_version() {
        let snapshot = Snapshot {
            version: 99,
            document: sample_document(),
        };
        let bytes = bincode::serialize(&snapshot).unwrap();
        let err = load_layout(bytes.as_slice());
        assert!(matches!(err, Err(PersistError::Version(99))));
    }

    #[test]
    fn test_ml_sample_shapes() {
        let doc = sample_document();
        let sample = format_for_ml(&doc);
        assert_eq!(sample.node.len(), 3);
        assert_eq!(sample.target.len(), 3);
        assert_eq!(sample.sub_components.len(), 3);
        assert_eq!(sample.edges.basic_component_edge.len(), 2);
        assert!((sample.node[0][0] - 0.2).abs() < 1e-9);
        assert_eq!(sample.symmetry_groups, vec![[0, 1]]);
    }

    #[test]
    fn test_ml_targets_are_content_centered() {
        let doc = sample_document();
        let sample = format_for_ml(&doc);
        // content bbox spans x [0.3, 1.7], y [0.2, 1.2] -> center (1.0, 0.7)
        // left leaf at (0.5, 1.0): shifted (-0.5, 0.3), normalized by 1.0
        assert!((sample.target[0][0] - -0.5).abs() < 1e-9);
        assert!((sample.target[0][1] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_ml_edges_reference_their_leaves() {
        let doc = sample_document();
        let sample = format_for_ml(&doc);
        let ([src, dst], offsets) = &sample.edges.basic_component_edge[0];
        assert_eq!((*src, *dst), (0, 1));
        // pins at the leaf centers have zero offsets
        for o in offsets {
            assert!(o.abs() < 1e-9);
        }
    }

    #[test]
    fn test_unresolvable_edge_is_skipped() {
        let mut doc = sample_document();
        doc.netlist_edges.push([[9.0, 9.0], [0.5, 1.0]]);
        let sample = format_for_ml(&doc);
        assert_eq!(sample.edges.basic_component_edge.len(), 2);
    }
}
