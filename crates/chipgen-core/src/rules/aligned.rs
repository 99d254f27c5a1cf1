//! Aligned multi-way split: equal slots along one axis, each child shrunk
//! and anchored within its slot.

use serde::{Deserialize, Serialize};

use crate::components::Component;

use super::{within_aspect, Orientation, RuleError};

/// Where a shrunk child sits inside its slot.
///
/// `Start` is left for vertical splits and bottom for horizontal ones;
/// `End` is right / top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Start,
    Center,
    End,
}

/// Divide one axis into `num_splits` equal slots (minus gaps), shrink each
/// slot by `global_scale * individual_scales[i]`, and anchor the child per
/// `alignment`. The other axis keeps the parent's extent.
///
/// All candidates are validated before any are committed: if any child
/// would have a non-positive dimension or break the aspect bound, the whole
/// operation is a no-op.
#[allow(clippy::too_many_arguments)]
pub fn split_aligned(
    c: &Component,
    orientation: Orientation,
    alignment: Alignment,
    num_splits: usize,
    global_scale: f64,
    individual_scales: &[f64],
    gap: f64,
    max_aspect: f64,
) -> Result<Vec<Component>, RuleError> {
    if num_splits <= 1 {
        return Ok(vec![c.clone()]);
    }
    if individual_scales.len() != num_splits {
        return Err(RuleError::ScaleCountMismatch {
            expected: num_splits,
            got: individual_scales.len(),
        });
    }

    let extent = match orientation {
        Orientation::Vertical => c.width,
        Orientation::Horizontal => c.height,
    };
    let slot = (extent - (num_splits - 1) as f64 * gap) / num_splits as f64;
    if slot <= 0.0 {
        return Ok(vec![c.clone()]);
    }

    let mut children = Vec::with_capacity(num_splits);
    let mut cursor = match orientation {
        Orientation::Vertical => c.x - c.width / 2.0,
        Orientation::Horizontal => c.y - c.height / 2.0,
    };
    for scale in individual_scales {
        let size = slot * global_scale * scale;
        if size <= 0.0 {
            return Ok(vec![c.clone()]);
        }
        let offset = match alignment {
            Alignment::Start => 0.0,
            Alignment::Center => (slot - size) / 2.0,
            Alignment::End => slot - size,
        };
        let child = match orientation {
            Orientation::Vertical => {
                c.child(cursor + offset + size / 2.0, c.y, size, c.height, "aligned")
            }
            Orientation::Horizontal => {
                c.child(c.x, cursor + offset + size / 2.0, c.width, size, "aligned")
            }
        };
        children.push(child);
        cursor += slot + gap;
    }

    if !within_aspect(&children, max_aspect) {
        return Ok(vec![c.clone()]);
    }
    Ok(children)
}
