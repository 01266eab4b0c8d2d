//! Vandermonde (polynomial feature) matrices of 1d samples.

use ndarray::{s, Array2, ArrayView1, Axis};
use num_traits::real::Real;

use crate::FitError;

/// Build the Vandermonde matrix of `xs` for polynomials of degree at most `degree`.
///
/// # Returns
/// An `xs.len() x (degree + 1)` array whose entry `[i, j]` is `xs[i]` raised to the `j`-th
/// power. The first column is all ones, including for samples equal to zero. Rows keep the
/// order of `xs`.
///
/// # Note
/// The powers are built by repeated multiplication so integer valued samples yield exact
/// results as long as they're representable.
///
/// # Example
/// ```
/// use ndarray::{arr1, arr2};
/// use polyfit_ridge::vandermonde;
///
/// let xs = arr1(&[2., 3.]);
/// assert_eq!(vandermonde(xs.view(), 2), arr2(&[[1., 2., 4.], [1., 3., 9.]]));
/// ```
pub fn vandermonde<R>(xs: ArrayView1<R>, degree: usize) -> Array2<R>
where
    R: Real,
{
    let mut features = Array2::from_elem((xs.len(), degree + 1), R::one());
    if degree > 0 {
        // broadcast the samples over all non-constant columns and take the cumulative product
        // along each row: [1, x, x, x] -> [1, x, x^2, x^3]
        features
            .slice_mut(s![.., 1..])
            .assign(&xs.insert_axis(Axis(1)));
        features.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr = *curr * prev);
    }
    features
}

/// Like [vandermonde] but accepts a signed degree.
///
/// # Errors
/// [FitError::NegativeDegree] if `degree < 0`.
///
/// # Example
/// ```
/// use ndarray::arr1;
/// use polyfit_ridge::{try_vandermonde, FitError};
///
/// let xs = arr1(&[1., 2.]);
/// assert_eq!(try_vandermonde(xs.view(), 1).unwrap().shape(), [2, 2]);
/// assert_eq!(try_vandermonde(xs.view(), -1), Err(FitError::NegativeDegree(-1)));
/// ```
pub fn try_vandermonde<R>(xs: ArrayView1<R>, degree: i64) -> Result<Array2<R>, FitError>
where
    R: Real,
{
    let degree = usize::try_from(degree).map_err(|_| FitError::NegativeDegree(degree))?;
    Ok(vandermonde(xs, degree))
}

/// Parallel version of [vandermonde]: the rows are filled on the rayon thread pool.
///
/// Returns exactly the same matrix as [vandermonde].
#[cfg(feature = "parallel_rayon")]
pub fn vandermonde_par<R>(xs: ArrayView1<R>, degree: usize) -> Array2<R>
where
    R: Real + Send + Sync,
{
    use ndarray::Zip;

    let mut features = Array2::zeros((xs.len(), degree + 1));
    Zip::from(features.rows_mut())
        .and(&xs)
        .par_for_each(|mut row, &x| {
            let mut power = R::one();
            for entry in row.iter_mut() {
                *entry = power;
                power = power * x;
            }
        });
    features
}
