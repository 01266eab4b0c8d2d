//! Linear least squares with an L2 penalty on the coefficients.
//!
//! [Ridge] minimizes
//! ```text
//! ||y - X w - b||^2 + alpha ||w||^2
//! ```
//! over the coefficients `w` and (optionally) the intercept `b`. Instead of forming the normal
//! equations `(X^T X + alpha I) w = X^T y` we solve the equivalent augmented least squares
//! problem
//! ```text
//! [      X     ]       [ y ]
//! [ sqrt(a) I  ] w  ~  [ 0 ]
//! ```
//! with givens rotations, which avoids squaring the condition number of the (typically badly
//! conditioned) Vandermonde matrices this crate feeds it.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use num_traits::real::Real;

use std::fmt::Debug;

use crate::{solve_upper_triangular_system, triangularize, FitError, Regressor};

/// Coefficients and intercept of a fitted [Ridge] model
#[derive(Debug, Clone, PartialEq)]
struct RidgeFit<R> {
    coefficients: Array1<R>,
    intercept: R,
}

/// Ridge regression.
///
/// The default model uses `alpha = 1` and fits an intercept. With an intercept the features and
/// targets are centered before solving, so a constant feature column (like the first column of
/// a Vandermonde matrix) receives a zero coefficient and the intercept absorbs the offset.
///
/// # Example
/// ```
/// use approx::assert_abs_diff_eq;
/// use ndarray::{arr1, arr2};
/// use polyfit_ridge::{Regressor, Ridge};
///
/// let xs = arr2(&[[1.], [2.], [3.]]);
/// let ys = arr1(&[2., 4., 6.]);
/// let mut ridge = Ridge::default();
/// ridge.fit(xs.view(), ys.view()).unwrap();
/// // the penalty shrinks the slope from 2 towards 0
/// assert_abs_diff_eq!(ridge.coefficients().unwrap()[0], 4. / 3., epsilon = 1e-12);
/// assert_abs_diff_eq!(ridge.intercept().unwrap(), 4. / 3., epsilon = 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ridge<R> {
    alpha: R,
    fit_intercept: bool,
    fitted: Option<RidgeFit<R>>,
}

impl<R> Default for Ridge<R>
where
    R: Real,
{
    fn default() -> Self {
        Self::new(R::one())
    }
}

impl<R> Ridge<R>
where
    R: Real,
{
    /// An unfitted model with regularization strength `alpha` that fits an intercept.
    ///
    /// `alpha` is validated when fitting.
    pub fn new(alpha: R) -> Self {
        Self {
            alpha,
            fit_intercept: true,
            fitted: None,
        }
    }

    /// Whether to fit a separate (unpenalized) intercept.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn alpha(&self) -> R {
        self.alpha
    }

    pub fn fits_intercept(&self) -> bool {
        self.fit_intercept
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The fitted coefficients, one per feature column.
    pub fn coefficients(&self) -> Option<ArrayView1<R>> {
        self.fitted.as_ref().map(|fit| fit.coefficients.view())
    }

    /// The fitted intercept. Always zero if the model doesn't fit one.
    pub fn intercept(&self) -> Option<R> {
        self.fitted.as_ref().map(|fit| fit.intercept)
    }
}

/// Mean of each column of `features` and the mean of `targets`
fn offsets<R>(
    features: ArrayView2<R>,
    targets: ArrayView1<R>,
) -> Result<(Array1<R>, R), FitError>
where
    R: Real,
{
    let n: R = num_traits::cast(targets.len()).ok_or(FitError::CastFailed)?;
    let x_offset = features.sum_axis(Axis(0)).mapv(|sum| sum / n);
    let y_offset = targets.sum() / n;
    Ok((x_offset, y_offset))
}

impl<R> Regressor<R> for Ridge<R>
where
    R: Real + Debug + 'static,
{
    fn fit(&mut self, features: ArrayView2<R>, targets: ArrayView1<R>) -> Result<(), FitError> {
        let (n_samples, n_features) = features.dim();
        if n_samples != targets.len() {
            return Err(FitError::InputsOfDifferentLengths);
        }
        if n_samples == 0 {
            return Err(FitError::NoData);
        }
        // also rejects NaN
        if !(self.alpha >= R::zero() && self.alpha <= R::max_value()) {
            return Err(FitError::InvalidAlpha);
        }
        log::debug!(
            "fitting ridge on {n_samples} samples with {n_features} features, alpha = {:?}",
            self.alpha
        );

        let (x_offset, y_offset) = if self.fit_intercept {
            offsets(features, targets)?
        } else {
            (Array1::zeros(n_features), R::zero())
        };

        // Columns that vanish after centering (e.g. the constant column when fitting an
        // intercept) get a zero coefficient and are left out of the system.
        let active: Vec<usize> = (0..n_features)
            .filter(|&j| features.column(j).iter().any(|&v| v != x_offset[j]))
            .collect();
        let p = active.len();

        // We create the block matrix
        // [X  y]
        // [P  0]
        // where X and y are the centered data and P = sqrt(alpha) I is the penalty block.
        let mut system_matrix = Array2::zeros((n_samples + p, p + 1));
        let penalty = self.alpha.sqrt();
        for (k, &j) in active.iter().enumerate() {
            system_matrix
                .slice_mut(s![..n_samples, k])
                .assign(&features.column(j).mapv(|v| v - x_offset[j]));
            system_matrix[[n_samples + k, k]] = penalty;
        }
        system_matrix
            .slice_mut(s![..n_samples, p])
            .assign(&targets.mapv(|y| y - y_offset));

        triangularize(system_matrix.view_mut(), p);

        let lhs = system_matrix.slice(s![..p, ..p]);
        let diag = lhs.diag();
        // with a penalty the factor has full rank, only a vanishing pivot is rejected
        let tolerance = if self.alpha > R::zero() {
            R::zero()
        } else {
            let scale = diag.fold(R::zero(), |acc, d| acc.max(d.abs()));
            let p: R = num_traits::cast(p).ok_or(FitError::CastFailed)?;
            scale * p * R::epsilon()
        };
        // negated comparison so that NaNs count as singular as well
        if diag.iter().any(|d| !(d.abs() > tolerance)) {
            log::debug!("ridge system is singular, diagonal: {diag:?}");
            return Err(FitError::SingularSystem);
        }

        let solution = solve_upper_triangular_system(lhs, system_matrix.slice(s![..p, p]));
        let mut coefficients = Array1::zeros(n_features);
        for (&j, &w) in active.iter().zip(solution.iter()) {
            coefficients[j] = w;
        }
        let intercept = y_offset - x_offset.dot(&coefficients);
        log::trace!("ridge coefficients: {coefficients:?}, intercept: {intercept:?}");

        self.fitted = Some(RidgeFit {
            coefficients,
            intercept,
        });
        Ok(())
    }

    fn predict(&self, features: ArrayView2<R>) -> Result<Array1<R>, FitError> {
        let fit = self.fitted.as_ref().ok_or(FitError::NotFitted)?;
        if features.ncols() != fit.coefficients.len() {
            return Err(FitError::FeatureMismatch {
                expected: fit.coefficients.len(),
                got: features.ncols(),
            });
        }
        Ok(features.dot(&fit.coefficients).mapv(|y| y + fit.intercept))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2, Array1, Array2};

    use super::*;
    use crate::vandermonde;

    #[test]
    fn single_feature_closed_form() {
        // centered: xc = [-1.5, -0.5, 0.5, 1.5], yc = [-3, 1, -1, 3]
        // => slope = sum(xc yc) / (sum(xc^2) + alpha) = 8 / (5 + alpha)
        let xs = arr2(&[[1.], [2.], [3.], [4.]]);
        let ys = arr1(&[1., 5., 3., 7.]);
        for alpha in [0., 0.5, 1., 10.] {
            let mut ridge = Ridge::new(alpha);
            ridge.fit(xs.view(), ys.view()).unwrap();
            let slope = 8. / (5. + alpha);
            assert_abs_diff_eq!(ridge.coefficients().unwrap()[0], slope, epsilon = 1e-12);
            assert_abs_diff_eq!(ridge.intercept().unwrap(), 4. - 2.5 * slope, epsilon = 1e-12);
        }
    }

    #[test]
    fn exact_polynomial_without_penalty() {
        let xs = Array1::linspace(-2., 3., 11);
        let ys = xs.mapv(|x| 0.5 * x * x * x - x + 2.);
        let features = vandermonde(xs.view(), 3);
        let mut ridge = Ridge::new(0.).with_fit_intercept(false);
        ridge.fit(features.view(), ys.view()).unwrap();
        assert_abs_diff_eq!(
            ridge.coefficients().unwrap(),
            arr1(&[2., -1., 0., 0.5]).view(),
            epsilon = 1e-9
        );
        assert_eq!(ridge.intercept(), Some(0.));
        let prediction = ridge.predict(features.view()).unwrap();
        assert_abs_diff_eq!(&prediction, &ys, epsilon = 1e-9);
    }

    #[test]
    fn constant_column_goes_to_intercept() {
        let xs = arr1(&[0., 1., 2., 3., 4.]);
        let ys = xs.mapv(|x| 3. * x + 1.);
        let features = vandermonde(xs.view(), 1);
        let mut ridge = Ridge::new(1e-12);
        ridge.fit(features.view(), ys.view()).unwrap();
        let coefficients = ridge.coefficients().unwrap();
        assert_eq!(coefficients[0], 0.);
        assert_abs_diff_eq!(coefficients[1], 3., epsilon = 1e-9);
        assert_abs_diff_eq!(ridge.intercept().unwrap(), 1., epsilon = 1e-9);
    }

    #[test]
    fn matches_normal_equations() {
        // (X^T X + I) w = X^T y for X = [[1, 0], [0, 1], [1, 1]], y = [1, 2, 3]
        // X^T X + I = [[3, 1], [1, 3]], X^T y = [4, 5] => w = [7/8, 11/8]
        let xs = arr2(&[[1., 0.], [0., 1.], [1., 1.]]);
        let ys = arr1(&[1., 2., 3.]);
        let mut ridge = Ridge::default().with_fit_intercept(false);
        ridge.fit(xs.view(), ys.view()).unwrap();
        assert_abs_diff_eq!(
            ridge.coefficients().unwrap(),
            arr1(&[7. / 8., 11. / 8.]).view(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn singular_without_penalty() {
        // second column is twice the first one
        let xs = arr2(&[[1., 2.], [0., 0.], [0., 0.]]);
        let ys = arr1(&[1., 0., 0.]);
        let mut ridge = Ridge::new(0.).with_fit_intercept(false);
        assert_eq!(
            ridge.fit(xs.view(), ys.view()),
            Err(FitError::SingularSystem)
        );
        assert!(!ridge.is_fitted());
        // any penalty makes the system solvable
        for alpha in [0.1, 1e-30] {
            let mut ridge = Ridge::new(alpha).with_fit_intercept(false);
            assert_eq!(ridge.fit(xs.view(), ys.view()), Ok(()));
        }
    }

    #[test]
    fn zero_column_gets_zero_coefficient() {
        let xs = arr2(&[[0., 1.], [0., 2.], [0., 3.]]);
        let ys = arr1(&[2., 4., 6.]);
        let mut ridge = Ridge::new(0.).with_fit_intercept(false);
        ridge.fit(xs.view(), ys.view()).unwrap();
        assert_eq!(ridge.coefficients().unwrap()[0], 0.);
        assert_abs_diff_eq!(ridge.coefficients().unwrap()[1], 2., epsilon = 1e-12);
    }

    #[test]
    fn unpenalized_vandermonde_with_intercept() {
        // centering turns the column of ones into a column of zeros
        let xs = arr1(&[1., 2., 3., 4.]);
        let ys = xs.mapv(|x| x * x - 2. * x + 5.);
        let features = vandermonde(xs.view(), 2);
        let mut ridge = Ridge::new(0.);
        ridge.fit(features.view(), ys.view()).unwrap();
        let coefficients = ridge.coefficients().unwrap();
        assert_eq!(coefficients[0], 0.);
        assert_abs_diff_eq!(coefficients[1], -2., epsilon = 1e-9);
        assert_abs_diff_eq!(coefficients[2], 1., epsilon = 1e-9);
        assert_abs_diff_eq!(ridge.intercept().unwrap(), 5., epsilon = 1e-9);
    }

    #[test]
    fn tiny_penalty_is_never_singular() {
        let xs = Array1::linspace(0., 10., 20);
        let ys = xs.mapv(|x: f64| x * x.sin());
        let features = vandermonde(xs.view(), 5);
        for alpha in [1e-20, 1e-26, 1e-300] {
            let mut ridge = Ridge::new(alpha);
            assert_eq!(ridge.fit(features.view(), ys.view()), Ok(()));
            assert!(ridge.coefficients().unwrap().iter().all(|w| w.is_finite()));
        }
    }

    #[test]
    fn no_features() {
        let xs: Array2<f64> = Array2::zeros((3, 0));
        let ys = arr1(&[1., 2., 6.]);
        let mut ridge = Ridge::default();
        ridge.fit(xs.view(), ys.view()).unwrap();
        assert_eq!(ridge.coefficients().unwrap().len(), 0);
        assert_abs_diff_eq!(ridge.intercept().unwrap(), 3., epsilon = 1e-12);
        assert_abs_diff_eq!(
            ridge.predict(Array2::zeros((2, 0)).view()).unwrap(),
            arr1(&[3., 3.]),
            epsilon = 1e-12
        );
    }

    #[test]
    fn different_lengths() {
        let xs = arr2(&[[1.], [2.]]);
        let ys = arr1(&[2., 4., 6.]);
        assert_eq!(
            Ridge::default().fit(xs.view(), ys.view()),
            Err(FitError::InputsOfDifferentLengths)
        );
    }

    #[test]
    fn empty_input() {
        let xs: Array2<f64> = Array2::zeros((0, 2));
        let ys = arr1(&[]);
        assert_eq!(
            Ridge::default().fit(xs.view(), ys.view()),
            Err(FitError::NoData)
        );
    }

    #[test]
    fn invalid_alpha() {
        let xs = arr2(&[[1.], [2.]]);
        let ys = arr1(&[2., 4.]);
        for alpha in [-1., f64::NAN, f64::INFINITY] {
            assert_eq!(
                Ridge::new(alpha).fit(xs.view(), ys.view()),
                Err(FitError::InvalidAlpha)
            );
        }
    }

    #[test]
    fn predict_errors() {
        let ridge: Ridge<f64> = Ridge::default();
        assert_eq!(
            ridge.predict(arr2(&[[1.]]).view()),
            Err(FitError::NotFitted)
        );

        let mut ridge = Ridge::default();
        ridge
            .fit(arr2(&[[1., 0.], [0., 1.]]).view(), arr1(&[1., 2.]).view())
            .unwrap();
        assert_eq!(
            ridge.predict(arr2(&[[1., 2., 3.]]).view()),
            Err(FitError::FeatureMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn refit_replaces_previous_fit() {
        let xs = arr2(&[[0.], [1.], [2.]]);
        let mut ridge = Ridge::new(0.);
        ridge.fit(xs.view(), arr1(&[0., 1., 2.]).view()).unwrap();
        ridge.fit(xs.view(), arr1(&[0., -2., -4.]).view()).unwrap();
        assert_abs_diff_eq!(ridge.coefficients().unwrap()[0], -2., epsilon = 1e-12);
    }
}
