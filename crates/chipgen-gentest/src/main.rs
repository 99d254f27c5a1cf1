//! Chipgen Headless Generation Harness
//!
//! Validates generation logic and exported data without rendering or file
//! output. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p chipgen-gentest
//!   cargo run -p chipgen-gentest -- --verbose

use chipgen_core::generation::reconcile::reconcile_count;
use chipgen_core::persistence::{format_for_ml, load_layout, save_layout, LayoutDocument};
use chipgen_core::prelude::*;
use chipgen_core::rules::basic::split_vertical;
use chipgen_core::rules::symmetric::{split_mirrored_vertical, split_triplet_vertical};
use chipgen_core::validate::{validate_all, Severity};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail,
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Chipgen Generation Harness ===\n");

    let mut results = Vec::new();

    // 1. Rule catalog geometry
    results.extend(validate_rule_catalog());

    // 2. Count reconciliation
    results.extend(validate_reconciler());

    // 3. Full pipeline sweep
    results.extend(validate_pipeline(verbose));

    // 4. Export formats
    results.extend(validate_export());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Rule catalog ─────────────────────────────────────────────────────

fn validate_rule_catalog() -> Vec<TestResult> {
    println!("--- Rule Catalog ---");
    let mut results = Vec::new();

    // vertical split reference values
    let unit = Component::new(0.0, 0.0, 1.0, 1.0, 0);
    let halves = split_vertical(&unit, 0.5, 0.1, 8.0);
    let ok = halves.len() == 2
        && (halves[0].width - 0.45).abs() < 1e-9
        && (halves[1].width - 0.45).abs() < 1e-9
        && (halves[0].x + 0.275).abs() < 1e-9
        && (halves[1].x - 0.275).abs() < 1e-9;
    results.push(TestResult::new(
        "vertical_reference_geometry",
        ok,
        format!("{} children", halves.len()),
    ));

    // triplet widths and conservation
    let triplet = split_triplet_vertical(&unit, 0.25, 0.02, 8.0);
    let widths: Vec<f64> = triplet.iter().map(|c| c.width).collect();
    let conserved = widths.iter().sum::<f64>() + 2.0 * 0.02;
    let ok = triplet.len() == 3
        && (widths[0] - widths[2]).abs() < 1e-9
        && (conserved - 1.0).abs() < 1e-9;
    results.push(TestResult::new(
        "triplet_outer_congruence",
        ok,
        format!("widths {:.3?}, conserved {:.6}", widths, conserved),
    ));

    // mirrored quadrants: four children, diagonal congruence
    let quads = split_mirrored_vertical(&unit, 0.4, 0.01, 8.0);
    let pairs = RuleKind::MirroredVertical.symmetry_pairs();
    let ok = quads.len() == 4
        && pairs.iter().all(|&(a, b)| {
            (quads[a].width - quads[b].width).abs() < 1e-9
                && (quads[a].height - quads[b].height).abs() < 1e-9
        });
    results.push(TestResult::new(
        "mirrored_diagonal_congruence",
        ok,
        format!("{} children", quads.len()),
    ));

    // area conservation across every committed rule draw
    let mut rng = StdRng::seed_from_u64(100);
    let mut checked = 0;
    let mut conserved_ok = true;
    for _ in 0..200 {
        for kind in RuleKind::ALL {
            let spec = SplitSpec::sample(kind, 0.01, &mut rng);
            let children = match spec.apply(&unit, 8.0) {
                Ok(c) => c,
                Err(_) => {
                    conserved_ok = false;
                    continue;
                }
            };
            if children.len() <= 1 || kind == RuleKind::Aligned {
                // aligned shrinks children below their slots; it makes no
                // conservation claim
                continue;
            }
            checked += 1;
            let child_area: f64 = children.iter().map(|c| c.area()).sum();
            // children plus gap strips must tile the parent exactly
            let gap_area = unit.area() - child_area;
            if gap_area < -1e-6 || gap_area > 0.2 {
                conserved_ok = false;
            }
        }
    }
    results.push(TestResult::new(
        "split_area_conservation",
        conserved_ok && checked > 100,
        format!("{} committed splits checked", checked),
    ));

    // silent degradation: a sliver no-ops every rule
    let sliver = Component::new(0.0, 0.0, 0.004, 1.0, 0);
    let mut degrade_ok = true;
    for kind in RuleKind::ALL {
        let spec = SplitSpec::sample(kind, 0.01, &mut rng);
        match spec.apply(&sliver, 8.0) {
            Ok(children) => {
                if kind != RuleKind::Hold && children.len() != 1 {
                    degrade_ok = false;
                }
            }
            Err(_) => degrade_ok = false,
        }
    }
    results.push(TestResult::new(
        "sliver_degrades_to_no_op",
        degrade_ok,
        "all rules".to_string(),
    ));

    results
}

// ── 2. Count reconciliation ─────────────────────────────────────────────

fn validate_reconciler() -> Vec<TestResult> {
    println!("--- Count Reconciler ---");
    let mut results = Vec::new();
    let cfg = GenerationConfig::default();

    // twelve leaves, target ten: exactly two pairwise merges
    let gap = cfg.component_gap;
    let mut components: Vec<Component> = (0..12)
        .map(|i| {
            let row = i / 6;
            let col = i % 6;
            let w = if row == 0 { 0.2 } else { 0.3 };
            let h = if row == 0 { 0.3 } else { 0.4 };
            Component::new(
                col as f64 * (w + gap) + w / 2.0,
                row as f64 * 1.0,
                w,
                h,
                0,
            )
        })
        .collect();
    let region = Component::new(1.0, 0.5, 4.0, 3.0, 0);
    let mut next_group = 1;
    let mut rng = StdRng::seed_from_u64(0);
    let mut diagnostics = Vec::new();
    reconcile_count(
        &mut components,
        &region,
        10,
        &cfg,
        &mut next_group,
        &mut rng,
        &mut diagnostics,
    );
    let merges = components
        .iter()
        .filter(|c| c.generate_rule == "merge")
        .count();
    results.push(TestResult::new(
        "merge_twelve_to_ten",
        components.len() == 10 && merges == 2 && diagnostics.is_empty(),
        format!("{} leaves, {} merges", components.len(), merges),
    ));

    // symmetric components are never merged
    let mut symmetric_row: Vec<Component> = (0..4)
        .map(|i| {
            let mut c = Component::new(i as f64 * 0.21 + 0.1, 0.0, 0.2, 0.2, 0);
            c.symmetric = true;
            c
        })
        .collect();
    let mut diagnostics = Vec::new();
    reconcile_count(
        &mut symmetric_row,
        &region,
        3,
        &cfg,
        &mut next_group,
        &mut rng,
        &mut diagnostics,
    );
    results.push(TestResult::new(
        "symmetric_never_merged",
        symmetric_row.len() == 4 && diagnostics.len() == 1,
        format!(
            "{} leaves kept, {} diagnostics",
            symmetric_row.len(),
            diagnostics.len()
        ),
    ));

    results
}

// ── 3. Full pipeline ────────────────────────────────────────────────────

fn validate_pipeline(verbose: bool) -> Vec<TestResult> {
    println!("--- Pipeline Sweep ---");
    let mut results = Vec::new();
    let mut on_target = 0usize;
    let mut audit_errors = 0usize;
    let mut leaf_total = 0usize;
    let seeds = 0..20u64;
    let seed_count = 20usize;

    for seed in seeds {
        let engine = match LayoutEngine::new(GenerationConfig {
            seed: Some(seed),
            ..Default::default()
        }) {
            Ok(e) => e,
            Err(e) => {
                results.push(TestResult::new(
                    "engine_construction",
                    false,
                    format!("seed {}: {}", seed, e),
                ));
                return results;
            }
        };
        let layout = match engine.generate() {
            Ok(l) => l,
            Err(e) => {
                results.push(TestResult::new(
                    "pipeline_run",
                    false,
                    format!("seed {}: {}", seed, e),
                ));
                continue;
            }
        };

        if layout.on_target() {
            on_target += 1;
        }
        leaf_total += layout.leaves.len();

        let findings = validate_all(
            &layout.leaves,
            &layout.edges,
            engine.config().max_aspect_ratio,
        );
        let errors: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        audit_errors += errors.len();
        if verbose {
            println!(
                "  seed {:2}: {} leaves (target {}), {} findings",
                seed,
                layout.leaves.len(),
                layout.target,
                findings.len()
            );
        }
        for finding in errors {
            println!("    [{}] {}", finding.category, finding.message);
        }
    }

    results.push(TestResult::new(
        "structural_audit_clean",
        audit_errors == 0,
        format!("{} audit errors over {} seeds", audit_errors, seed_count),
    ));
    results.push(TestResult::new(
        "targets_reached",
        on_target >= seed_count / 2,
        format!("{}/{} runs on target", on_target, seed_count),
    ));
    results.push(TestResult::new(
        "leaf_volume_sane",
        leaf_total / seed_count >= 10,
        format!("mean {} leaves per run", leaf_total / seed_count),
    ));

    // determinism under a fixed seed
    let mk = || {
        LayoutEngine::new(GenerationConfig {
            seed: Some(7),
            ..Default::default()
        })
    };
    let (a, b) = match (mk(), mk()) {
        (Ok(ea), Ok(eb)) => (ea.generate(), eb.generate()),
        _ => {
            results.push(TestResult::new(
                "deterministic_replay",
                false,
                "engine construction failed".to_string(),
            ));
            return results;
        }
    };
    let ok = match (a, b) {
        (Ok(la), Ok(lb)) => {
            la.leaves.len() == lb.leaves.len()
                && la
                    .leaves
                    .iter()
                    .zip(&lb.leaves)
                    .all(|(x, y)| x.x == y.x && x.y == y.y && x.width == y.width)
        }
        _ => false,
    };
    results.push(TestResult::new(
        "deterministic_replay",
        ok,
        "seed 7 twice".to_string(),
    ));

    results
}

// ── 4. Export formats ───────────────────────────────────────────────────

fn validate_export() -> Vec<TestResult> {
    println!("--- Export Formats ---");
    let mut results = Vec::new();

    let engine = match LayoutEngine::new(GenerationConfig {
        seed: Some(31),
        ..Default::default()
    }) {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult::new(
                "export_setup",
                false,
                format!("{}", e),
            ));
            return results;
        }
    };
    let layout = match engine.generate() {
        Ok(l) => l,
        Err(e) => {
            results.push(TestResult::new(
                "export_setup",
                false,
                format!("{}", e),
            ));
            return results;
        }
    };
    let document = LayoutDocument::from_layout(&layout);

    // JSON round trip
    let json_ok = document
        .to_json()
        .ok()
        .and_then(|json| LayoutDocument::from_json(&json).ok())
        .map(|back| back.final_leaf_components.len() == layout.leaves.len())
        .unwrap_or(false);
    results.push(TestResult::new(
        "json_round_trip",
        json_ok,
        format!("{} leaves", layout.leaves.len()),
    ));

    // raw JSON shape: the consumer reads these exact keys
    let shape_ok = document
        .to_json()
        .ok()
        .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok())
        .map(|value| {
            value.get("root_component").is_some()
                && value.get("final_leaf_components").is_some()
                && value.get("netlist_edges").is_some()
        })
        .unwrap_or(false);
    results.push(TestResult::new(
        "json_schema_keys",
        shape_ok,
        "root_component / final_leaf_components / netlist_edges".to_string(),
    ));

    // binary snapshot round trip
    let mut buffer = Vec::new();
    let snapshot_ok = save_layout(&mut buffer, &document).is_ok()
        && load_layout(buffer.as_slice())
            .map(|back| back.final_leaf_components.len() == layout.leaves.len())
            .unwrap_or(false);
    results.push(TestResult::new(
        "snapshot_round_trip",
        snapshot_ok,
        format!("{} bytes", buffer.len()),
    ));

    // ML sample: per-leaf rows, normalized dims, resolvable edges
    let sample = format_for_ml(&document);
    let rows_ok = sample.node.len() == layout.leaves.len()
        && sample.target.len() == layout.leaves.len()
        && sample.sub_components.len() == layout.leaves.len();
    let norm_ok = sample
        .node
        .iter()
        .all(|[w, h]| *w > 0.0 && *w <= 1.0 && *h > 0.0 && *h <= 1.0);
    let edges_ok = sample.edges.basic_component_edge.len() == layout.edges.len();
    results.push(TestResult::new(
        "ml_sample_consistent",
        rows_ok && norm_ok && edges_ok,
        format!(
            "{} nodes, {} edges",
            sample.node.len(),
            sample.edges.basic_component_edge.len()
        ),
    ));

    results
}
