//! Geometry validation for finished layouts.
//!
//! Pure functions that take a leaf list and return validation errors.
//! Generation never calls these implicitly; they exist for tests, the
//! harness, and callers that want a structural audit before export.

use std::collections::HashMap;

use crate::components::Component;
use crate::generation::netlist::NetlistEdge;

/// A layout validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Per-leaf geometry ────────────────────────────────────────────────

/// Check that no leaf has zero or negative dimensions.
pub fn check_dimensions(leaves: &[Component]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, c) in leaves.iter().enumerate() {
        if c.width <= 0.0 || c.height <= 0.0 {
            errors.push(ValidationError {
                category: "leaf_geometry",
                severity: Severity::Error,
                message: format!(
                    "leaf #{} has non-positive dimensions: {}x{}",
                    i, c.width, c.height
                ),
            });
        }
    }
    errors
}

/// Check that every leaf honors the aspect-ratio bound.
pub fn check_aspect_ratios(leaves: &[Component], max_aspect: f64) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, c) in leaves.iter().enumerate() {
        if c.width <= 0.0 || c.height <= 0.0 {
            continue; // caught by the dimension check
        }
        let ratio = c.aspect_ratio();
        if ratio > max_aspect + 1e-9 {
            errors.push(ValidationError {
                category: "leaf_geometry",
                severity: Severity::Error,
                message: format!(
                    "leaf #{} has aspect ratio {:.2}:1 over the bound {:.2} ({}x{})",
                    i, ratio, max_aspect, c.width, c.height
                ),
            });
        }
    }
    errors
}

/// Check leaf recursion levels against a depth bound.
pub fn check_levels(leaves: &[Component], max_depth: u32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, c) in leaves.iter().enumerate() {
        if c.level > max_depth {
            errors.push(ValidationError {
                category: "lineage",
                severity: Severity::Error,
                message: format!("leaf #{} at level {} exceeds depth bound {}", i, c.level, max_depth),
            });
        }
    }
    errors
}

// ── B. Pairwise geometry ────────────────────────────────────────────────

/// Check that no two leaves overlap.
pub fn check_overlaps(leaves: &[Component]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for i in 0..leaves.len() {
        for j in (i + 1)..leaves.len() {
            if leaves[i].overlaps(&leaves[j]) {
                errors.push(ValidationError {
                    category: "overlap",
                    severity: Severity::Error,
                    message: format!(
                        "leaves #{} and #{} overlap: ({:.4},{:.4}) {}x{} vs ({:.4},{:.4}) {}x{}",
                        i,
                        j,
                        leaves[i].x,
                        leaves[i].y,
                        leaves[i].width,
                        leaves[i].height,
                        leaves[j].x,
                        leaves[j].y,
                        leaves[j].width,
                        leaves[j].height
                    ),
                });
            }
        }
    }
    errors
}

// ── C. Symmetry bookkeeping ─────────────────────────────────────────────

/// Check that symmetry pairs are well-formed: at most two members per pair
/// id, and surviving pairs dimensionally congruent. A pair reduced to one
/// member (its mate was split further or dropped) is only a warning.
pub fn check_symmetry_pairs(leaves: &[Component]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut groups: HashMap<i32, Vec<usize>> = HashMap::new();
    for (i, c) in leaves.iter().enumerate() {
        if c.symmetric_group_id >= 0 {
            groups.entry(c.symmetric_group_id).or_default().push(i);
        }
    }
    for (gid, members) in groups {
        match members.len() {
            1 => errors.push(ValidationError {
                category: "symmetry",
                severity: Severity::Warning,
                message: format!("symmetry pair {} has a single surviving member", gid),
            }),
            2 => {
                let (a, b) = (&leaves[members[0]], &leaves[members[1]]);
                if (a.width - b.width).abs() > 1e-6 || (a.height - b.height).abs() > 1e-6 {
                    errors.push(ValidationError {
                        category: "symmetry",
                        severity: Severity::Error,
                        message: format!(
                            "symmetry pair {} members differ: {}x{} vs {}x{}",
                            gid, a.width, a.height, b.width, b.height
                        ),
                    });
                }
                if !a.symmetric || !b.symmetric {
                    errors.push(ValidationError {
                        category: "symmetry",
                        severity: Severity::Error,
                        message: format!("symmetry pair {} has an unmarked member", gid),
                    });
                }
            }
            n => errors.push(ValidationError {
                category: "symmetry",
                severity: Severity::Error,
                message: format!("symmetry pair {} has {} members", gid, n),
            }),
        }
    }
    errors
}

// ── D. Netlist ──────────────────────────────────────────────────────────

/// Check that every edge endpoint falls inside exactly one leaf.
pub fn check_pin_containment(
    leaves: &[Component],
    edges: &[NetlistEdge],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (e, edge) in edges.iter().enumerate() {
        for (side, pin) in edge.iter().enumerate() {
            let owners = leaves
                .iter()
                .filter(|l| l.contains_point(pin[0], pin[1], 1e-6))
                .count();
            if owners != 1 {
                errors.push(ValidationError {
                    category: "netlist",
                    severity: Severity::Error,
                    message: format!(
                        "edge #{} pin {} at ({:.4},{:.4}) is inside {} leaves",
                        e, side, pin[0], pin[1], owners
                    ),
                });
            }
        }
    }
    errors
}

/// Run every check that applies to a finished layout.
pub fn validate_all(
    leaves: &[Component],
    edges: &[NetlistEdge],
    max_aspect: f64,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(check_dimensions(leaves));
    errors.extend(check_aspect_ratios(leaves, max_aspect));
    errors.extend(check_overlaps(leaves));
    errors.extend(check_symmetry_pairs(leaves));
    errors.extend(check_pin_containment(leaves, edges));
    errors
}
