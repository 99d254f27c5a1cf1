//! Ratio-list splits: deterministic fixture builders outside the weighted
//! catalog. No gap is inserted and no aspect gate is applied; callers that
//! need the bound validate the result themselves.

use crate::components::Component;

use super::{Orientation, RuleError};

/// Split one axis into parts proportional to `ratios`.
///
/// An empty ratio list yields an empty result; a non-positive ratio sum is
/// a caller bug.
pub fn split_by_ratio(
    c: &Component,
    ratios: &[f64],
    orientation: Orientation,
) -> Result<Vec<Component>, RuleError> {
    if ratios.is_empty() {
        return Ok(Vec::new());
    }
    let total: f64 = ratios.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(RuleError::NonPositiveRatioSum);
    }

    let mut children = Vec::with_capacity(ratios.len());
    match orientation {
        Orientation::Horizontal => {
            let mut cursor = c.y - c.height / 2.0;
            for ratio in ratios {
                let h = c.height * (ratio / total);
                children.push(c.child(c.x, cursor + h / 2.0, c.width, h, "split_ratio_horizontal"));
                cursor += h;
            }
        }
        Orientation::Vertical => {
            let mut cursor = c.x - c.width / 2.0;
            for ratio in ratios {
                let w = c.width * (ratio / total);
                children.push(c.child(cursor + w / 2.0, c.y, w, c.height, "split_ratio_vertical"));
                cursor += w;
            }
        }
    }
    Ok(children)
}

/// Split into a grid: horizontal strips by `h_ratios`, then each strip
/// vertically by `v_ratios`. Cells sit one level below the parent.
pub fn split_by_ratio_grid(
    c: &Component,
    h_ratios: &[f64],
    v_ratios: &[f64],
) -> Result<Vec<Component>, RuleError> {
    let strips = split_by_ratio(c, h_ratios, Orientation::Horizontal)?;
    let mut cells = Vec::with_capacity(h_ratios.len() * v_ratios.len());
    for strip in &strips {
        cells.extend(split_by_ratio(strip, v_ratios, Orientation::Vertical)?);
    }
    Ok(cells
        .into_iter()
        .map(|cell| Component {
            level: c.level + 1,
            generate_rule: "split_by_ratio_grid".to_string(),
            ..cell
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_split_normalizes() {
        let c = Component::new(0.0, 0.0, 1.0, 1.0, 0);
        let parts = split_by_ratio(&c, &[1.0, 2.0, 1.0], Orientation::Vertical).unwrap();
        assert_eq!(parts.len(), 3);
        assert!((parts[0].width - 0.25).abs() < 1e-9);
        assert!((parts[1].width - 0.5).abs() < 1e-9);
        let total: f64 = parts.iter().map(|p| p.width).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_cell_count_and_level() {
        let c = Component::new(0.0, 0.0, 2.0, 1.0, 0).with_level(1);
        let cells = split_by_ratio_grid(&c, &[1.0, 1.0], &[1.0, 1.0, 2.0]).unwrap();
        assert_eq!(cells.len(), 6);
        for cell in &cells {
            assert_eq!(cell.level, 2);
            assert_eq!(cell.generate_rule, "split_by_ratio_grid");
        }
    }

    #[test]
    fn test_zero_ratio_sum_fails_fast() {
        let c = Component::new(0.0, 0.0, 1.0, 1.0, 0);
        let err = split_by_ratio(&c, &[0.0, 0.0], Orientation::Vertical);
        assert!(matches!(err, Err(RuleError::NonPositiveRatioSum)));
    }
}
