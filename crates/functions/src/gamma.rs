use ndarray::ArrayView2;
use statrs::function::gamma::gamma_lr;

use crate::{Error, Family, params};

/// Gamma selection starting at `ST_min`, truncated at `ST_max`.
///
/// The cumulative probability is the regularized lower incomplete gamma
/// function `P(shape, (ST - ST_min) / scale)`, rescaled so that it reaches
/// one at a finite `ST_max`. Use `f64::INFINITY` for an untruncated
/// distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Gamma {
    st_min: Vec<f64>,
    st_max: Vec<f64>,
    scale: Vec<f64>,
    shape: Vec<f64>,
    rescale: Vec<f64>,
}

impl Gamma {
    /// Creates a gamma selection function from per-timestep parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the series are empty or ragged, `ST_min` is not
    /// finite, `ST_max <= ST_min`, or `scale`/`shape` are not positive.
    pub fn new(
        st_min: Vec<f64>,
        st_max: Vec<f64>,
        scale: Vec<f64>,
        shape: Vec<f64>,
    ) -> Result<Self, Error> {
        params::check_lengths(
            Family::Gamma,
            &[
                st_min.as_slice(),
                st_max.as_slice(),
                scale.as_slice(),
                shape.as_slice(),
            ],
        )?;

        let mut rescale = Vec::with_capacity(st_min.len());
        for row in 0..st_min.len() {
            let invalid = |reason| Error::InvalidParameter {
                family: Family::Gamma,
                row,
                reason,
            };
            if !st_min[row].is_finite() {
                return Err(invalid("ST_min must be finite"));
            }
            if st_max[row].is_nan() || st_max[row] <= st_min[row] {
                return Err(invalid("ST_max must be greater than ST_min"));
            }
            if !(scale[row] > 0.0 && scale[row].is_finite()) {
                return Err(invalid("scale must be positive and finite"));
            }
            if !(shape[row] > 0.0 && shape[row].is_finite()) {
                return Err(invalid("shape must be positive and finite"));
            }

            rescale.push(if st_max[row].is_finite() {
                1.0 / gamma_lr(shape[row], (st_max[row] - st_min[row]) / scale[row])
            } else {
                1.0
            });
        }

        Ok(Self {
            st_min,
            st_max,
            scale,
            shape,
            rescale,
        })
    }

    /// Creates a gamma selection function from
    /// `[ST_min, ST_max, scale, shape]` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not have four columns or any row is
    /// invalid.
    pub fn from_params(params: ArrayView2<'_, f64>) -> Result<Self, Error> {
        let [st_min, st_max, scale, shape] = params::columns(Family::Gamma, params)?;
        Self::new(st_min, st_max, scale, shape)
    }

    fn cdf(&self, st: f64, timestep: usize) -> f64 {
        let row = params::row(self.st_min.len(), timestep);
        let (min, max) = (self.st_min[row], self.st_max[row]);
        if st >= max {
            1.0
        } else if st > min {
            let x = (st - min) / self.scale[row];
            gamma_lr(self.shape[row], x) * self.rescale[row]
        } else {
            0.0
        }
    }
}

impl_selection_function!(Gamma);
