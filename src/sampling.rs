//! Picking training samples out of a grid.

use ndarray::{Array1, ArrayView1};
use num_traits::real::Real;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use std::cmp::Ordering;

/// Shuffle a copy of `xs` with an rng seeded by `seed`, keep the first `n` entries (or all of
/// them if there are fewer) and sort those ascending.
///
/// The result only depends on `xs`, `n` and `seed`.
///
/// # Example
/// ```
/// use ndarray::Array1;
/// use polyfit_ridge::sampling::sorted_subset;
///
/// let grid = Array1::linspace(0., 10., 100);
/// let xs = sorted_subset(grid.view(), 20, 0);
/// assert_eq!(xs.len(), 20);
/// assert!(xs.windows(2).into_iter().all(|w| w[0] <= w[1]));
/// ```
pub fn sorted_subset<R>(xs: ArrayView1<R>, n: usize, seed: u64) -> Array1<R>
where
    R: Real,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = xs.to_vec();
    samples.shuffle(&mut rng);
    samples.truncate(n);
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Array1::from(samples)
}
