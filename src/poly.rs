//! Basic polynomials in the monomial basis.

use ndarray::{Array1, ArrayView1};
use num_traits::{One, Zero};
use std::fmt;
use std::{
    marker::PhantomData,
    ops::{Add, Mul, Neg},
};

/// A monomial polynomial that owns its coeffs in form of a `Vec`.
pub type OwnedMonomialPolynomial<C> = MonomialPolynomial<C, Vec<C>>;

/// A monomial polynomial with borrowed coeffs.
pub type RefMonomialPolynomial<'a, C> = MonomialPolynomial<C, &'a [C]>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MonomialPolynomial<C, DataC>
where
    DataC: AsRef<[C]>,
{
    coeffs: DataC,
    _phantom: PhantomData<C>,
}

impl<C, DataC> MonomialPolynomial<C, DataC>
where
    DataC: AsRef<[C]>,
{
    /// Construct the polynomial
    ///     coeffs\[0\] + coeffs\[1\] x + coeffs\[2\] x^2 + ...
    /// of degree `coeffs.len() - 1`.
    ///
    /// # Panics
    /// If `coeffs` is empty.
    pub fn new(coeffs: DataC) -> Self {
        assert!(!coeffs.as_ref().is_empty());
        Self {
            coeffs,
            _phantom: PhantomData,
        }
    }

    /// The degree of the polynomial, i.e. the number of coefficients minus one. Vanishing
    /// leading coefficients still count.
    pub fn degree(&self) -> usize {
        self.coeffs.as_ref().len() - 1
    }

    /// The coefficients in order of increasing power
    pub fn coeffs(&self) -> &[C] {
        self.coeffs.as_ref()
    }

    /// Evaluate the polynomial at a point using Horner's scheme
    /// α₀ + x(α₁ + x(α₂ + x(...)))
    pub fn eval(&self, x: C) -> C
    where
        C: Clone + Zero + Add<Output = C> + Mul<Output = C>,
    {
        self.coeffs
            .as_ref()
            .iter()
            .rev()
            .fold(C::zero(), |acc, alpha| acc * x.clone() + alpha.clone())
    }

    /// Evaluate the polynomial at each of `xs`
    pub fn eval_many(&self, xs: ArrayView1<C>) -> Array1<C>
    where
        C: Clone + Zero + Add<Output = C> + Mul<Output = C>,
    {
        xs.map(|x| self.eval(x.clone()))
    }

    /// Borrow the polynomial
    pub fn view(&self) -> RefMonomialPolynomial<'_, C> {
        MonomialPolynomial::new(self.coeffs.as_ref())
    }

    /// Turn a polynomial into it's constituent coefficients
    pub fn into_raw(self) -> DataC {
        self.coeffs
    }
}

impl<C, DataC> fmt::Display for MonomialPolynomial<C, DataC>
where
    C: fmt::Display + Clone + Zero + One + PartialOrd + Neg<Output = C>,
    DataC: AsRef<[C]>,
{
    /// Writes e.g. `1 - 2x + 0.5x^3`; vanishing terms other than a lone constant are skipped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = false;
        for (power, alpha) in self.coeffs.as_ref().iter().enumerate() {
            if alpha.is_zero() {
                continue;
            }
            let negative = *alpha < C::zero();
            let magnitude = if negative { -alpha.clone() } else { alpha.clone() };
            match (written, negative) {
                (false, false) => {}
                (false, true) => f.write_str("-")?,
                (true, false) => f.write_str(" + ")?,
                (true, true) => f.write_str(" - ")?,
            }
            if power == 0 || !magnitude.is_one() {
                match f.precision() {
                    Some(precision) => write!(f, "{magnitude:.precision$}")?,
                    None => write!(f, "{magnitude}")?,
                }
            }
            match power {
                0 => {}
                1 => f.write_str("x")?,
                _ => write!(f, "x^{power}")?,
            }
            written = true;
        }
        if !written {
            f.write_str("0")?;
        }
        Ok(())
    }
}
