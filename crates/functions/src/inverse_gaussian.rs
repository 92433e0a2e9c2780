use std::f64::consts::SQRT_2;

use ndarray::ArrayView2;
use statrs::function::erf::erfc;

use crate::{Error, Family, params};

/// Inverse Gaussian selection of `(ST - loc) / scale` with mean `mu`.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseGaussian {
    loc: Vec<f64>,
    scale: Vec<f64>,
    mu: Vec<f64>,
}

impl InverseGaussian {
    /// Creates an inverse Gaussian selection function from per-timestep
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the series are empty or ragged, `loc` is not
    /// finite, or `scale`/`mu` are not positive.
    pub fn new(loc: Vec<f64>, scale: Vec<f64>, mu: Vec<f64>) -> Result<Self, Error> {
        params::check_lengths(
            Family::InverseGaussian,
            &[loc.as_slice(), scale.as_slice(), mu.as_slice()],
        )?;

        for row in 0..loc.len() {
            let invalid = |reason| Error::InvalidParameter {
                family: Family::InverseGaussian,
                row,
                reason,
            };
            if !loc[row].is_finite() {
                return Err(invalid("loc must be finite"));
            }
            if !(scale[row] > 0.0 && scale[row].is_finite()) {
                return Err(invalid("scale must be positive and finite"));
            }
            if !(mu[row] > 0.0 && mu[row].is_finite()) {
                return Err(invalid("mu must be positive and finite"));
            }
        }

        Ok(Self { loc, scale, mu })
    }

    /// Creates an inverse Gaussian selection function from
    /// `[loc, scale, mu]` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not have three columns or any row is
    /// invalid.
    pub fn from_params(params: ArrayView2<'_, f64>) -> Result<Self, Error> {
        let [loc, scale, mu] = params::columns(Family::InverseGaussian, params)?;
        Self::new(loc, scale, mu)
    }

    fn cdf(&self, st: f64, timestep: usize) -> f64 {
        let row = params::row(self.loc.len(), timestep);
        let x = (st - self.loc[row]) / self.scale[row];
        if x <= 0.0 {
            return 0.0;
        }
        if x.is_infinite() {
            return 1.0;
        }

        let mu = self.mu[row];
        let spread = (x.sqrt() * SQRT_2) * mu;
        0.5 * (erfc((mu - x) / spread) + (2.0 / mu).exp() * erfc((x + mu) / spread))
    }
}

impl_selection_function!(InverseGaussian);
