use ndarray::ArrayView2;

use crate::{Error, Family, params};

/// Kumaraswamy selection over the storage range `[ST_min, ST_max]`.
///
/// With `x = (ST - ST_min) / (ST_max - ST_min)` the cumulative probability is
/// `1 - (1 - x^a)^b`. Shapes with `a < 1` favour young water, `b < 1` old
/// water; `a = b = 1` reduces to [`Uniform`](crate::Uniform).
#[derive(Debug, Clone, PartialEq)]
pub struct Kumaraswamy {
    st_min: Vec<f64>,
    st_max: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl Kumaraswamy {
    /// Creates a Kumaraswamy selection function from per-timestep parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the series are empty or ragged, a bound is not
    /// finite, `ST_max <= ST_min`, or a shape parameter is not positive.
    pub fn new(st_min: Vec<f64>, st_max: Vec<f64>, a: Vec<f64>, b: Vec<f64>) -> Result<Self, Error> {
        params::check_lengths(
            Family::Kumaraswamy,
            &[st_min.as_slice(), st_max.as_slice(), a.as_slice(), b.as_slice()],
        )?;

        for row in 0..st_min.len() {
            let invalid = |reason| Error::InvalidParameter {
                family: Family::Kumaraswamy,
                row,
                reason,
            };
            if !st_min[row].is_finite() || !st_max[row].is_finite() {
                return Err(invalid("bounds must be finite"));
            }
            if st_max[row] <= st_min[row] {
                return Err(invalid("ST_max must be greater than ST_min"));
            }
            if !(a[row] > 0.0 && a[row].is_finite() && b[row] > 0.0 && b[row].is_finite()) {
                return Err(invalid("shape parameters must be positive and finite"));
            }
        }

        Ok(Self {
            st_min,
            st_max,
            a,
            b,
        })
    }

    /// Creates a Kumaraswamy selection function from
    /// `[ST_min, ST_max, a, b]` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not have four columns or any row is
    /// invalid.
    pub fn from_params(params: ArrayView2<'_, f64>) -> Result<Self, Error> {
        let [st_min, st_max, a, b] = params::columns(Family::Kumaraswamy, params)?;
        Self::new(st_min, st_max, a, b)
    }

    fn cdf(&self, st: f64, timestep: usize) -> f64 {
        let row = params::row(self.st_min.len(), timestep);
        let (min, max) = (self.st_min[row], self.st_max[row]);
        if st >= max {
            1.0
        } else if st > min {
            let x = (st - min) / (max - min);
            1.0 - (1.0 - x.powf(self.a[row])).powf(self.b[row])
        } else {
            0.0
        }
    }
}

impl_selection_function!(Kumaraswamy);
