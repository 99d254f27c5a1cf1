//! Post-processing over the finished leaf list: random drop and padding.

use rand::Rng;

use crate::components::Component;
use crate::config::ConfigError;

/// Keep a uniformly random subset of `round(n * (1 - drop_ratio))` leaves,
/// preserving the original order of the survivors.
pub fn drop_by_ratio(
    components: &[Component],
    drop_ratio: f64,
    rng: &mut impl Rng,
) -> Result<Vec<Component>, ConfigError> {
    if !(0.0..=1.0).contains(&drop_ratio) {
        return Err(ConfigError::BadDropRatio(drop_ratio));
    }
    let keep = (components.len() as f64 * (1.0 - drop_ratio)).round() as usize;
    if keep >= components.len() {
        return Ok(components.to_vec());
    }
    let mut kept_indices = rand::seq::index::sample(rng, components.len(), keep).into_vec();
    kept_indices.sort_unstable();
    Ok(kept_indices
        .into_iter()
        .map(|i| components[i].clone())
        .collect())
}

/// Shrink every leaf by `padding` on all four sides; centers are unchanged.
///
/// An oversized padding is a caller bug: the whole operation fails before
/// any component is modified.
pub fn add_padding(components: &mut [Component], padding: f64) -> Result<(), ConfigError> {
    if padding < 0.0 {
        return Err(ConfigError::NegativePadding(padding));
    }
    for c in components.iter() {
        if c.width - 2.0 * padding <= 0.0 || c.height - 2.0 * padding <= 0.0 {
            return Err(ConfigError::PaddingTooLarge {
                padding,
                width: c.width,
                height: c.height,
            });
        }
    }
    for c in components.iter_mut() {
        c.width -= 2.0 * padding;
        c.height -= 2.0 * padding;
    }
    Ok(())
}
