//! Sampling helpers shared by training and move selection

use rand::{Rng, distr::StandardUniform, prelude::IndexedRandom};

/// Sample an item with probability proportional to its weight.
///
/// # Type Parameters
///
/// - `R`: Random number generator implementing `Rng`
/// - `T`: Type of items to sample from (must be `Clone`)
/// - `W`: Type representing weights (must convert to `f64`)
///
/// # Returns
///
/// - `Some(item)` if sampling succeeds
/// - `None` if the items slice is empty
///
/// # Behavior
///
/// - Weights that are negative or NaN count as zero
/// - If no weight is positive, falls back to uniform random selection
/// - The last positively weighted item is returned if rounding leaves the
///   threshold unconsumed
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use tictree::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];
/// let sampled = weighted_sample(&mut rng, &items);
/// assert!(sampled.is_some());
/// ```
pub fn weighted_sample<R, T, W>(rng: &mut R, items: &[(T, W)]) -> Option<T>
where
    R: Rng,
    T: Clone,
    W: Into<f64> + Copy,
{
    if items.is_empty() {
        return None;
    }

    let effective = |w: W| -> f64 {
        let w = w.into();
        if w > 0.0 { w } else { 0.0 }
    };

    let total: f64 = items.iter().map(|(_, w)| effective(*w)).sum();

    if total <= 0.0 || !total.is_finite() {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut threshold = rng.sample::<f64, _>(StandardUniform) * total;

    for (item, weight) in items {
        let w = effective(*weight);
        if threshold < w {
            return Some(item.clone());
        }
        threshold -= w;
    }

    items
        .iter()
        .rev()
        .find(|(_, w)| effective(*w) > 0.0)
        .map(|(item, _)| item.clone())
}

/// Uniformly pick an index in `0..len`, or `None` when `len` is zero
pub fn uniform_index<R: Rng>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.random_range(0..len))
    }
}
