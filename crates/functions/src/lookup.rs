use ndarray::{Array1, ArrayView2};
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};

use crate::{Error, Family, params};

/// Time-invariant selection function given as a table of `(S_T, Omega)`
/// points, linearly interpolated.
///
/// `Omega` must start at 0 and end at 1. Storage below the first point maps to
/// 0 and storage above the last point maps to 1.
#[derive(Debug)]
pub struct LookupTable {
    interp: Interp1DOwned<f64, Linear>,
    st_min: f64,
    st_max: f64,
}

impl LookupTable {
    /// Creates a lookup table from storage points and cumulative probabilities.
    ///
    /// # Errors
    ///
    /// Returns an error if `omega` does not run from 0 to 1, is decreasing, or
    /// the storage grid is not strictly increasing.
    pub fn new(s_t: Vec<f64>, omega: Vec<f64>) -> Result<Self, Error> {
        params::check_lengths(Family::LookupTable, &[s_t.as_slice(), omega.as_slice()])?;

        #[allow(clippy::float_cmp)]
        let spans_unit_interval = omega.first() == Some(&0.0) && omega.last() == Some(&1.0);
        if !spans_unit_interval {
            return Err(Error::LookupBounds);
        }
        if let Some(row) = omega.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::InvalidParameter {
                family: Family::LookupTable,
                row: row + 1,
                reason: "Omega must be nondecreasing",
            });
        }

        let st_min = s_t[0];
        let st_max = s_t[s_t.len() - 1];
        let interp = Interp1DOwned::new(
            Array1::from(s_t),
            Array1::from(omega),
            Linear,
            Extrapolate::Clamp,
        )?;

        Ok(Self {
            interp,
            st_min,
            st_max,
        })
    }

    /// Creates a lookup table from `[S_T, Omega]` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not have two columns or the table is
    /// invalid.
    pub fn from_params(params: ArrayView2<'_, f64>) -> Result<Self, Error> {
        let [s_t, omega] = params::columns(Family::LookupTable, params)?;
        Self::new(s_t, omega)
    }

    fn cdf(&self, st: f64, _timestep: usize) -> f64 {
        if st <= self.st_min {
            0.0
        } else if st >= self.st_max {
            1.0
        } else {
            // Inside the grid, so interpolation cannot fail.
            self.interp.interpolate(&[st]).unwrap_or(f64::NAN)
        }
    }
}

impl_selection_function!(LookupTable);
