//! Generation configuration.
//!
//! A single immutable [`GenerationConfig`] is constructed once and passed by
//! reference into every stage of the pipeline; no stage reads ambient state.
//! Invalid configurations are caller bugs and fail fast through
//! [`ConfigError`] before any generation work starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::RuleKind;

/// Everything the generation pipeline consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Canvas dimensions; the initial rectangle is centered on the canvas.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Sampled area of the initial center rectangle.
    pub area_range: (f64, f64),
    /// Sampled width/height ratio of the initial center rectangle.
    pub aspect_ratio_range: (f64, f64),
    /// Maximum depth probed by the depth search (K).
    pub max_search_depth: u32,
    /// Maximum partition depth of an accepted filler (J).
    pub max_filler_depth: u32,
    /// Inclusive range the final leaf-count target is drawn from.
    pub target_range: (usize, usize),
    /// Number of filler slots attempted after the center partition.
    pub num_filler_components: usize,
    /// Sampled edge length of a filler rectangle.
    pub filler_size_range: (f64, f64),
    /// Clearance left between sibling rectangles by every split.
    pub component_gap: f64,
    /// Long-side / short-side bound every retained rectangle must satisfy.
    pub max_aspect_ratio: f64,
    /// Placement attempts per filler slot before the slot is abandoned.
    pub placement_retry_limit: usize,
    /// Per-rule selection weight overrides; rules not listed keep weight 1.
    pub rule_weights: Vec<(RuleKind, f64)>,
    /// Fraction of leaves randomly discarded before reconciliation
    /// (0.0 disables).
    pub drop_ratio: f64,
    /// Post-reconciliation shrink applied to every leaf on all four sides
    /// (0.0 disables).
    pub padding: f64,
    /// Number of synthetic pin-to-pin netlist edges to generate.
    pub num_netlist_edges: usize,
    /// RNG seed; `None` seeds from entropy. A fixed seed reproduces a
    /// layout exactly.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            canvas_width: 2.0,
            canvas_height: 2.0,
            area_range: (1.5, 2.5),
            aspect_ratio_range: (0.2, 5.0),
            max_search_depth: 5,
            max_filler_depth: 2,
            target_range: (20, 40),
            num_filler_components: 10,
            filler_size_range: (0.05, 0.2),
            component_gap: 0.01,
            max_aspect_ratio: 8.0,
            placement_retry_limit: 200,
            rule_weights: Vec::new(),
            drop_ratio: 0.0,
            padding: 0.0,
            num_netlist_edges: 30,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Check every field; the first violation aborts with a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::BadCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        check_range("area_range", self.area_range)?;
        check_range("aspect_ratio_range", self.aspect_ratio_range)?;
        check_range("filler_size_range", self.filler_size_range)?;
        if self.target_range.0 == 0 || self.target_range.0 > self.target_range.1 {
            return Err(ConfigError::BadRange {
                name: "target_range",
                lo: self.target_range.0 as f64,
                hi: self.target_range.1 as f64,
            });
        }
        if self.max_search_depth == 0 {
            return Err(ConfigError::ZeroSearchDepth);
        }
        if self.component_gap <= 0.0 {
            return Err(ConfigError::NonPositiveGap(self.component_gap));
        }
        if self.max_aspect_ratio < 1.0 {
            return Err(ConfigError::BadAspectBound(self.max_aspect_ratio));
        }
        for (rule, weight) in &self.rule_weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::BadRuleWeight {
                    rule: rule.name(),
                    weight: *weight,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.drop_ratio) {
            return Err(ConfigError::BadDropRatio(self.drop_ratio));
        }
        if self.padding < 0.0 {
            return Err(ConfigError::NegativePadding(self.padding));
        }
        Ok(())
    }
}

fn check_range(name: &'static str, (lo, hi): (f64, f64)) -> Result<(), ConfigError> {
    if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
        return Err(ConfigError::BadRange { name, lo, hi });
    }
    Ok(())
}

/// A caller bug in the configuration. These abort generation immediately;
/// they are never recovered from at runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    BadCanvas { width: f64, height: f64 },

    #[error("{name} is empty, inverted, or non-positive: ({lo}, {hi})")]
    BadRange { name: &'static str, lo: f64, hi: f64 },

    #[error("max_search_depth must be at least 1")]
    ZeroSearchDepth,

    #[error("component gap must be positive, got {0}")]
    NonPositiveGap(f64),

    #[error("max aspect ratio must be >= 1, got {0}")]
    BadAspectBound(f64),

    #[error("weight for rule '{rule}' must be finite and non-negative, got {weight}")]
    BadRuleWeight { rule: &'static str, weight: f64 },

    #[error("every selectable rule has zero weight")]
    ZeroWeightSum,

    #[error("drop ratio must be within [0, 1], got {0}")]
    BadDropRatio(f64),

    #[error("padding must be non-negative, got {0}")]
    NegativePadding(f64),

    #[error("padding {padding} too large for component {width}x{height}")]
    PaddingTooLarge {
        padding: f64,
        width: f64,
        height: f64,
    },
}
