//! Polynomial regression: Vandermonde features of 1d samples fed into a [Regressor].

use ndarray::{Array1, ArrayView1};
use num_traits::real::Real;

use crate::poly::OwnedMonomialPolynomial;
use crate::{vandermonde, FitError, MonomialPolynomial, Regressor, Ridge};

/// A regressor working on the Vandermonde matrix of its inputs for some fixed degree.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialRegression<M> {
    degree: usize,
    model: M,
}

impl<M> PolynomialRegression<M> {
    pub fn new(degree: usize, model: M) -> Self {
        Self { degree, model }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Fit the underlying model to the samples `xs` and the values `ys` at those samples.
    ///
    /// # Errors
    /// Whatever the model returns; [FitError::InputsOfDifferentLengths] for the [Ridge] model if
    /// `xs` and `ys` differ in length.
    pub fn fit<R>(&mut self, xs: ArrayView1<R>, ys: ArrayView1<R>) -> Result<(), FitError>
    where
        R: Real,
        M: Regressor<R>,
    {
        let features = vandermonde(xs, self.degree);
        self.model.fit(features.view(), ys)
    }

    /// Predict the values at `xs`.
    pub fn predict<R>(&self, xs: ArrayView1<R>) -> Result<Array1<R>, FitError>
    where
        R: Real,
        M: Regressor<R>,
    {
        let features = vandermonde(xs, self.degree);
        self.model.predict(features.view())
    }
}

impl<R> PolynomialRegression<Ridge<R>>
where
    R: Real,
{
    /// The fitted polynomial in the monomial basis, with the intercept folded into the constant
    /// coefficient. `None` if the model hasn't been fitted yet.
    ///
    /// # Example
    /// ```
    /// use approx::assert_abs_diff_eq;
    /// use ndarray::arr1;
    /// use polyfit_ridge::{PolynomialRegression, Ridge};
    ///
    /// let xs = arr1(&[0., 1., 2., 3.]);
    /// let ys = arr1(&[1., 3., 5., 7.]);
    /// // the column of ones is absorbed by the intercept
/// let mut model = PolynomialRegression::new(1, Ridge::new(0.));
    /// assert!(model.polynomial().is_none());
    /// model.fit(xs.view(), ys.view()).unwrap();
    /// let poly = model.polynomial().unwrap();
    /// assert_abs_diff_eq!(poly.coeffs()[0], 1., epsilon = 1e-12);
    /// assert_abs_diff_eq!(poly.coeffs()[1], 2., epsilon = 1e-12);
    /// ```
    pub fn polynomial(&self) -> Option<OwnedMonomialPolynomial<R>> {
        let coefficients = self.model.coefficients()?;
        let intercept = self.model.intercept()?;
        let mut coeffs = coefficients.to_vec();
        let constant = coeffs.first_mut()?;
        *constant = *constant + intercept;
        Some(MonomialPolynomial::new(coeffs))
    }
}

/// Fit one polynomial regression per entry of `degrees`, in the given order, each with a fresh
/// model from `make_model`.
///
/// # Errors
/// The first error any of the fits returns.
///
/// # Example
/// ```
/// use ndarray::Array1;
/// use polyfit_ridge::{fit_degrees, Ridge};
///
/// let xs = Array1::linspace(0., 10., 20);
/// let ys = xs.mapv(|x: f64| x * x.sin());
/// let fits = fit_degrees(xs.view(), ys.view(), &[3, 4, 5], Ridge::default).unwrap();
/// assert_eq!(fits.iter().map(|fit| fit.degree()).collect::<Vec<_>>(), [3, 4, 5]);
/// ```
pub fn fit_degrees<R, M, F>(
    xs: ArrayView1<R>,
    ys: ArrayView1<R>,
    degrees: &[usize],
    make_model: F,
) -> Result<Vec<PolynomialRegression<M>>, FitError>
where
    R: Real,
    M: Regressor<R>,
    F: Fn() -> M,
{
    degrees
        .iter()
        .map(|&degree| {
            log::debug!("fitting polynomial of degree {degree}");
            let mut regression = PolynomialRegression::new(degree, make_model());
            regression.fit(xs, ys)?;
            Ok(regression)
        })
        .collect()
}

/// Parallel version of [fit_degrees]: the degrees are fitted on the rayon thread pool. The
/// result keeps the order of `degrees`.
#[cfg(feature = "parallel_rayon")]
pub fn fit_degrees_par<R, M, F>(
    xs: ArrayView1<R>,
    ys: ArrayView1<R>,
    degrees: &[usize],
    make_model: F,
) -> Result<Vec<PolynomialRegression<M>>, FitError>
where
    R: Real + Send + Sync,
    M: Regressor<R> + Send,
    F: Fn() -> M + Sync,
{
    use rayon::prelude::*;

    degrees
        .par_iter()
        .map(|&degree| {
            log::debug!("fitting polynomial of degree {degree}");
            let mut regression = PolynomialRegression::new(degree, make_model());
            regression.fit(xs, ys)?;
            Ok(regression)
        })
        .collect()
}
