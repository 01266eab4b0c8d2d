//! Polynomial interpolation with a linear model: build the Vandermonde matrix of some 1d
//! samples and hand it to a regressor.
//!
//! The [Vandermonde matrix](vandermonde::vandermonde) of `n` samples for a polynomial of degree
//! `d` is the `n x (d + 1)` matrix
//!
//! ```text
//! [[1, x_1, x_1^2, ..., x_1^d],
//!  [1, x_2, x_2^2, ..., x_2^d],
//!  ...]
//! ```
//!
//! Its columns can be read as pseudo features (the samples raised to some power), so fitting
//! any linear model on them yields a polynomial. The models are reached through the
//! [`Regressor`] trait; [`Ridge`] is the one shipped with this crate.
//!
//! # Example
//! ```
//! use approx::assert_abs_diff_eq;
//! use ndarray::arr1;
//! use polyfit_ridge::{PolynomialRegression, Ridge};
//!
//! let xs = arr1(&[0., 1., 2., 3., 4.]);
//! let ys = xs.mapv(|x| x * x - 2. * x + 1.);
//! // no regularization and no separate intercept: plain least squares on the features
//! let mut model = PolynomialRegression::new(2, Ridge::new(0.).with_fit_intercept(false));
//! model.fit(xs.view(), ys.view()).unwrap();
//! let prediction = model.predict(arr1(&[5.]).view()).unwrap();
//! assert_abs_diff_eq!(prediction[0], 16., epsilon = 1e-9);
//! ```

pub mod interpolate;
#[cfg(feature = "plotting")]
pub mod plot;
pub mod poly;
pub mod ridge;
pub mod sampling;
pub mod vandermonde;

pub use interpolate::{fit_degrees, PolynomialRegression};
#[cfg(feature = "parallel_rayon")]
pub use interpolate::fit_degrees_par;
pub use poly::{MonomialPolynomial, OwnedMonomialPolynomial};
pub use ridge::Ridge;
#[cfg(feature = "parallel_rayon")]
pub use vandermonde::vandermonde_par;
pub use vandermonde::{try_vandermonde, vandermonde};

use ndarray::{s, Array1, ArrayView1, ArrayView2, ArrayViewMut2};
use num_traits::real::Real;

use std::fmt::Debug;

/// The errors that can occur while building features or fitting a model
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("features and targets have different lengths")]
    InputsOfDifferentLengths,
    #[error("polynomial degree must be non-negative, got {0}")]
    NegativeDegree(i64),
    #[error("regularization strength must be non-negative and finite")]
    InvalidAlpha,
    #[error("can't fit a model without any samples")]
    NoData,
    #[error("model was fitted on {expected} features but got {got}")]
    FeatureMismatch { expected: usize, got: usize },
    #[error("model has to be fitted before predicting")]
    NotFitted,
    #[error("the linear system is singular")]
    SingularSystem,
    #[error("sample count can't be represented in the scalar type")]
    CastFailed,
}

/// A model that learns a linear map from a feature matrix to targets.
///
/// Rows of `features` are samples, columns are features.
pub trait Regressor<R> {
    /// Fit the model to `features` (`n_samples x n_features`) and `targets` (`n_samples`).
    fn fit(&mut self, features: ArrayView2<R>, targets: ArrayView1<R>) -> Result<(), FitError>;

    /// Predict one target per row of `features`.
    fn predict(&self, features: ArrayView2<R>) -> Result<Array1<R>, FitError>;
}

/// Apply a givens rotation eliminating entry [i,j] of the given array *in-place* using row `j`
/// as pivot. Entries that are already zero are left alone.
#[inline]
fn apply_givens<R>(mut arr: ArrayViewMut2<R>, i: usize, j: usize)
where
    R: Real + Debug,
{
    let a = arr[[j, j]];
    let b = arr[[i, j]];
    if b == R::zero() {
        return;
    }
    let r = a.hypot(b);
    let c = a / r;
    let s = -b / r;
    for col_idx in 0..arr.ncols() {
        let new_j = c * arr[[j, col_idx]] - s * arr[[i, col_idx]];
        let new_i = s * arr[[j, col_idx]] + c * arr[[i, col_idx]];
        arr[[j, col_idx]] = new_j;
        arr[[i, col_idx]] = new_i;
    }
}

/// Bring the first `cols` columns of `arr` into upper triangular form. Every column after
/// those (e.g. right hand sides) is rotated along.
fn triangularize<R>(mut arr: ArrayViewMut2<R>, cols: usize)
where
    R: Real + Debug,
{
    let rows = arr.nrows();
    for col in 0..cols {
        for row in col + 1..rows {
            apply_givens(arr.view_mut(), row, col);
        }
    }
}

/// Solves the linear system `matrix_product(lhs, x) = rhs` for `x`.
///
/// # Returns
/// The solution vector.
///
/// # Arguments
/// * `lhs` is a nonsingular upper triangular matrix
/// * `rhs` a vector with a dimension matching `lhs`
///
/// # Panics
/// If `lhs` isn't square or its size doesn't match `rhs`.
///
/// # Examples
/// ```
/// use approx::assert_abs_diff_eq;
/// use ndarray::{arr1, arr2};
/// use polyfit_ridge::solve_upper_triangular_system;
///
/// let lhs = arr2(&[[0.5, 0.5, 0.5], [0., 0.25, 0.25], [0., 0., 0.125]]);
/// let rhs = arr1(&[1., 1., 1.]);
/// let correct_sol = arr1(&[-2., -4., 8.]);
/// let our_sol = solve_upper_triangular_system(lhs.view(), rhs.view());
///
/// assert_abs_diff_eq!(&our_sol, &correct_sol, epsilon = 1e-12);
/// ```
pub fn solve_upper_triangular_system<R>(lhs: ArrayView2<R>, rhs: ArrayView1<R>) -> Array1<R>
where
    R: Real + Debug + 'static,
{
    assert!(lhs.is_square());
    assert_eq!(lhs.ncols(), rhs.len());
    let row_count = rhs.len();
    let mut sol = Array1::zeros(row_count);
    for i in (0..row_count).rev() {
        let ax = lhs.slice(s![i, i + 1..]).dot(&sol.slice(s![i + 1..]));
        sol[i] = (rhs[i] - ax) / lhs[[i, i]];
    }
    sol
}
