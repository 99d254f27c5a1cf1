//! The split-rule catalog.
//!
//! Every rule is a pure function from one rectangle (plus typed parameters)
//! to a list of child rectangles. A rule that cannot honor its contract,
//! because a child would have a non-positive dimension or violate the
//! aspect-ratio bound, returns the input unchanged instead of erroring. This silent
//! degradation is expected and frequent; only malformed parameters
//! (a caller bug) produce a [`RuleError`].
//!
//! The catalog is a static registry: [`RuleKind`] enumerates every rule and
//! [`SplitSpec`] carries the parameters for one application. There is no
//! runtime rule discovery.

pub mod aligned;
pub mod basic;
pub mod ratio;
pub mod symmetric;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Component;

pub use aligned::Alignment;
pub use ratio::{split_by_ratio, split_by_ratio_grid};

/// Axis a multi-part split runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Identifier for every rule in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Vertical,
    Horizontal,
    Quadrants,
    Aligned,
    MirroredVertical,
    MirroredHorizontal,
    CommonCentroid,
    TripletVertical,
    TripletHorizontal,
    Hold,
}

impl RuleKind {
    pub const ALL: [RuleKind; 10] = [
        RuleKind::Vertical,
        RuleKind::Horizontal,
        RuleKind::Quadrants,
        RuleKind::Aligned,
        RuleKind::MirroredVertical,
        RuleKind::MirroredHorizontal,
        RuleKind::CommonCentroid,
        RuleKind::TripletVertical,
        RuleKind::TripletHorizontal,
        RuleKind::Hold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleKind::Vertical => "vertical",
            RuleKind::Horizontal => "horizontal",
            RuleKind::Quadrants => "quadrants",
            RuleKind::Aligned => "aligned",
            RuleKind::MirroredVertical => "mirrored_vertical",
            RuleKind::MirroredHorizontal => "mirrored_horizontal",
            RuleKind::CommonCentroid => "common_centroid",
            RuleKind::TripletVertical => "triplet_vertical",
            RuleKind::TripletHorizontal => "triplet_horizontal",
            RuleKind::Hold => "hold",
        }
    }

    pub fn from_name(name: &str) -> Option<RuleKind> {
        RuleKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Rules whose committed splits mark their children `symmetric`.
    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            RuleKind::MirroredVertical
                | RuleKind::MirroredHorizontal
                | RuleKind::CommonCentroid
                | RuleKind::TripletVertical
                | RuleKind::TripletHorizontal
        )
    }

    /// Child-index pairs forming one mirror/centroid unit each, valid for
    /// the child ordering the rule commits.
    pub fn symmetry_pairs(self) -> &'static [(usize, usize)] {
        match self {
            // ordering [TL, BL, BR, TR]: diagonals pair up
            RuleKind::MirroredVertical => &[(0, 2), (1, 3)],
            // ordering [TL, TR, BL, BR]
            RuleKind::MirroredHorizontal => &[(0, 3), (1, 2)],
            // ordering [LB, LT, RB, RT]
            RuleKind::CommonCentroid => &[(0, 3), (1, 2)],
            // ordering [side, center, side]
            RuleKind::TripletVertical | RuleKind::TripletHorizontal => &[(0, 2)],
            _ => &[],
        }
    }
}

/// Typed parameters for one application of a rule.
#[derive(Debug, Clone)]
pub enum SplitSpec {
    Vertical {
        ratio: f64,
        gap: f64,
    },
    Horizontal {
        ratio: f64,
        gap: f64,
    },
    Quadrants {
        ratio_v: f64,
        ratio_h: f64,
        gap: f64,
    },
    Aligned {
        orientation: Orientation,
        alignment: Alignment,
        num_splits: usize,
        global_scale: f64,
        individual_scales: Vec<f64>,
        gap: f64,
    },
    MirroredVertical {
        ratio_h: f64,
        gap: f64,
    },
    MirroredHorizontal {
        ratio_v: f64,
        gap: f64,
    },
    CommonCentroid {
        gap: f64,
    },
    TripletVertical {
        ratio_w: f64,
        gap: f64,
    },
    TripletHorizontal {
        ratio_h: f64,
        gap: f64,
    },
    Hold,
}

impl SplitSpec {
    pub fn kind(&self) -> RuleKind {
        match self {
            SplitSpec::Vertical { .. } => RuleKind::Vertical,
            SplitSpec::Horizontal { .. } => RuleKind::Horizontal,
            SplitSpec::Quadrants { .. } => RuleKind::Quadrants,
            SplitSpec::Aligned { .. } => RuleKind::Aligned,
            SplitSpec::MirroredVertical { .. } => RuleKind::MirroredVertical,
            SplitSpec::MirroredHorizontal { .. } => RuleKind::MirroredHorizontal,
            SplitSpec::CommonCentroid { .. } => RuleKind::CommonCentroid,
            SplitSpec::TripletVertical { .. } => RuleKind::TripletVertical,
            SplitSpec::TripletHorizontal { .. } => RuleKind::TripletHorizontal,
            SplitSpec::Hold => RuleKind::Hold,
        }
    }

    /// Draw parameters for `kind` from the generator's distributions.
    pub fn sample(kind: RuleKind, gap: f64, rng: &mut impl Rng) -> SplitSpec {
        match kind {
            RuleKind::Vertical => SplitSpec::Vertical {
                ratio: rng.gen_range(0.3..0.7),
                gap,
            },
            RuleKind::Horizontal => SplitSpec::Horizontal {
                ratio: rng.gen_range(0.3..0.7),
                gap,
            },
            RuleKind::Quadrants => SplitSpec::Quadrants {
                ratio_v: rng.gen_range(0.3..0.7),
                ratio_h: rng.gen_range(0.3..0.7),
                gap,
            },
            RuleKind::Aligned => {
                let num_splits = rng.gen_range(2..=4);
                SplitSpec::Aligned {
                    orientation: if rng.gen_bool(0.5) {
                        Orientation::Vertical
                    } else {
                        Orientation::Horizontal
                    },
                    alignment: match rng.gen_range(0..3) {
                        0 => Alignment::Start,
                        1 => Alignment::Center,
                        _ => Alignment::End,
                    },
                    num_splits,
                    global_scale: rng.gen_range(0.7..0.95),
                    individual_scales: (0..num_splits)
                        .map(|_| rng.gen_range(0.8..1.0))
                        .collect(),
                    gap,
                }
            }
            RuleKind::MirroredVertical => SplitSpec::MirroredVertical {
                ratio_h: rng.gen_range(0.3..0.7),
                gap,
            },
            RuleKind::MirroredHorizontal => SplitSpec::MirroredHorizontal {
                ratio_v: rng.gen_range(0.3..0.7),
                gap,
            },
            RuleKind::CommonCentroid => SplitSpec::CommonCentroid { gap },
            RuleKind::TripletVertical => SplitSpec::TripletVertical {
                ratio_w: rng.gen_range(0.2..0.45),
                gap,
            },
            RuleKind::TripletHorizontal => SplitSpec::TripletHorizontal {
                ratio_h: rng.gen_range(0.2..0.45),
                gap,
            },
            RuleKind::Hold => SplitSpec::Hold,
        }
    }

    /// Apply the rule to `component`.
    ///
    /// Geometric infeasibility degrades to a no-op (the unchanged input is
    /// returned as a singleton). Malformed parameters fail fast.
    pub fn apply(
        &self,
        component: &Component,
        max_aspect: f64,
    ) -> Result<Vec<Component>, RuleError> {
        let mut children = match self {
            SplitSpec::Vertical { ratio, gap } => {
                basic::split_vertical(component, *ratio, *gap, max_aspect)
            }
            SplitSpec::Horizontal { ratio, gap } => {
                basic::split_horizontal(component, *ratio, *gap, max_aspect)
            }
            SplitSpec::Quadrants {
                ratio_v,
                ratio_h,
                gap,
            } => basic::split_quadrants(component, *ratio_v, *ratio_h, *gap, max_aspect),
            SplitSpec::Aligned {
                orientation,
                alignment,
                num_splits,
                global_scale,
                individual_scales,
                gap,
            } => aligned::split_aligned(
                component,
                *orientation,
                *alignment,
                *num_splits,
                *global_scale,
                individual_scales,
                *gap,
                max_aspect,
            )?,
            SplitSpec::MirroredVertical { ratio_h, gap } => {
                symmetric::split_mirrored_vertical(component, *ratio_h, *gap, max_aspect)
            }
            SplitSpec::MirroredHorizontal { ratio_v, gap } => {
                symmetric::split_mirrored_horizontal(component, *ratio_v, *gap, max_aspect)
            }
            SplitSpec::CommonCentroid { gap } => {
                symmetric::split_common_centroid(component, *gap, max_aspect)
            }
            SplitSpec::TripletVertical { ratio_w, gap } => {
                symmetric::split_triplet_vertical(component, *ratio_w, *gap, max_aspect)
            }
            SplitSpec::TripletHorizontal { ratio_h, gap } => {
                symmetric::split_triplet_horizontal(component, *ratio_h, *gap, max_aspect)
            }
            SplitSpec::Hold => vec![component.clone().with_rule("hold")],
        };

        if children.len() > 1 && self.kind().is_symmetric() {
            for child in &mut children {
                child.symmetric = true;
            }
        }
        Ok(children)
    }
}

/// True when every rectangle satisfies the aspect-ratio bound.
pub(crate) fn within_aspect(children: &[Component], max_aspect: f64) -> bool {
    children.iter().all(|c| c.aspect_ratio() <= max_aspect)
}

/// A caller bug at the rule layer: bad names or malformed parameters.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    #[error("unknown keep mode '{0}'")]
    UnknownMode(String),

    #[error("rule name '{name}' does not match supplied parameters for '{spec}'")]
    ParamMismatch { name: String, spec: &'static str },

    #[error("aligned split expects {expected} individual scales, got {got}")]
    ScaleCountMismatch { expected: usize, got: usize },

    #[error("ratio list must sum to a positive value")]
    NonPositiveRatioSum,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_round_trips_names() {
        for kind in RuleKind::ALL {
            assert_eq!(RuleKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(RuleKind::from_name("diagonal"), None);
    }

    #[test]
    fn test_symmetric_rule_set() {
        let symmetric: Vec<_> = RuleKind::ALL
            .iter()
            .filter(|k| k.is_symmetric())
            .collect();
        assert_eq!(symmetric.len(), 5);
        assert!(!RuleKind::Quadrants.is_symmetric());
        assert!(!RuleKind::Hold.is_symmetric());
    }

    #[test]
    fn test_hold_is_identity_apart_from_tag() {
        let c = Component::new(0.3, 0.4, 1.0, 2.0, 3).with_rule("vertical");
        let out = SplitSpec::Hold.apply(&c, 8.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].generate_rule, "hold");
        assert_eq!(out[0].width, c.width);
        assert_eq!(out[0].level, c.level);
        assert!(!out[0].symmetric);
    }

    #[test]
    fn test_sampled_spec_matches_kind() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        for kind in RuleKind::ALL {
            let spec = SplitSpec::sample(kind, 0.01, &mut rng);
            assert_eq!(spec.kind(), kind);
        }
    }
}
