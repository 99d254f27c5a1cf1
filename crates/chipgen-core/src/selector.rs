//! Weighted rule selection and keep-mode filtering.

use rand::Rng;

use crate::components::Component;
use crate::config::ConfigError;
use crate::rules::{RuleError, RuleKind, SplitSpec};

/// Which children of a committed split survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepMode {
    KeepAll,
    KeepFirst,
    KeepSecond,
    KeepRandom,
}

impl KeepMode {
    pub const ALL: [KeepMode; 4] = [
        KeepMode::KeepAll,
        KeepMode::KeepFirst,
        KeepMode::KeepSecond,
        KeepMode::KeepRandom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KeepMode::KeepAll => "keep_all",
            KeepMode::KeepFirst => "keep_first",
            KeepMode::KeepSecond => "keep_second",
            KeepMode::KeepRandom => "keep_random",
        }
    }

    pub fn from_name(name: &str) -> Option<KeepMode> {
        KeepMode::ALL.iter().copied().find(|m| m.name() == name)
    }
}

/// Chooses rules by configured weight and applies them with a keep mode.
///
/// The full catalog is always selectable; rules without an explicit weight
/// default to 1. Weight problems are caller bugs caught at construction.
#[derive(Debug, Clone)]
pub struct RuleSelector {
    weights: Vec<(RuleKind, f64)>,
}

impl RuleSelector {
    /// Every rule at weight 1.
    pub fn new() -> Self {
        Self {
            weights: RuleKind::ALL.iter().map(|&k| (k, 1.0)).collect(),
        }
    }

    /// Catalog with per-rule weight overrides.
    pub fn with_weights(overrides: &[(RuleKind, f64)]) -> Result<Self, ConfigError> {
        let mut selector = Self::new();
        for (kind, weight) in overrides {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::BadRuleWeight {
                    rule: kind.name(),
                    weight: *weight,
                });
            }
            for entry in &mut selector.weights {
                if entry.0 == *kind {
                    entry.1 = *weight;
                }
            }
        }
        let total: f64 = selector.weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(ConfigError::ZeroWeightSum);
        }
        Ok(selector)
    }

    /// Cumulative-weight draw over the catalog.
    pub fn choose(&self, rng: &mut impl Rng) -> RuleKind {
        let total: f64 = self.weights.iter().map(|(_, w)| w).sum();
        let mut draw = rng.gen_range(0.0..total);
        for (kind, weight) in &self.weights {
            if draw < *weight {
                return *kind;
            }
            draw -= weight;
        }
        // floating-point slack lands on the last positively-weighted rule
        self.weights[self.weights.len() - 1].0
    }

    /// Apply `spec` to `component` and filter the result per `mode`.
    ///
    /// A no-op result (one rectangle or fewer) passes through unfiltered.
    pub fn apply(
        &self,
        component: &Component,
        spec: &SplitSpec,
        mode: KeepMode,
        max_aspect: f64,
        rng: &mut impl Rng,
    ) -> Result<Vec<Component>, RuleError> {
        let children = spec.apply(component, max_aspect)?;
        if children.len() <= 1 {
            return Ok(children);
        }
        Ok(match mode {
            KeepMode::KeepAll => children,
            KeepMode::KeepFirst => vec![children[0].clone()],
            KeepMode::KeepSecond => vec![children[1].clone()],
            KeepMode::KeepRandom => {
                vec![children[rng.gen_range(0..children.len())].clone()]
            }
        })
    }

    /// String-keyed entry point: resolves rule and mode by name, failing
    /// fast on unknown names or a name/parameter mismatch.
    pub fn apply_named(
        &self,
        component: &Component,
        rule_name: &str,
        mode_name: &str,
        spec: &SplitSpec,
        max_aspect: f64,
        rng: &mut impl Rng,
    ) -> Result<Vec<Component>, RuleError> {
        let kind = RuleKind::from_name(rule_name)
            .ok_or_else(|| RuleError::UnknownRule(rule_name.to_string()))?;
        let mode = KeepMode::from_name(mode_name)
            .ok_or_else(|| RuleError::UnknownMode(mode_name.to_string()))?;
        if kind != spec.kind() {
            return Err(RuleError::ParamMismatch {
                name: rule_name.to_string(),
                spec: spec.kind().name(),
            });
        }
        self.apply(component, spec, mode, max_aspect, rng)
    }
}

impl Default for RuleSelector {
    fn default() -> Self {
        Self::new()
    }
}
