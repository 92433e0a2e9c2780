use ndarray::ArrayView2;

use crate::{Error, Family, params};

/// Uniform selection over the storage range `[ST_min, ST_max]`.
///
/// Setting `ST_min = 0` and `ST_max` to the total storage describes complete
/// mixing: every stored age is equally likely to leave.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    st_min: Vec<f64>,
    st_max: Vec<f64>,
}

impl Uniform {
    /// Creates a uniform selection function from per-timestep bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the series are empty, have different lengths, or
    /// any row has `ST_max <= ST_min` or a non-finite bound.
    pub fn new(st_min: Vec<f64>, st_max: Vec<f64>) -> Result<Self, Error> {
        params::check_lengths(Family::Uniform, &[st_min.as_slice(), st_max.as_slice()])?;

        for (row, (&min, &max)) in st_min.iter().zip(&st_max).enumerate() {
            if !min.is_finite() || !max.is_finite() {
                return Err(Error::InvalidParameter {
                    family: Family::Uniform,
                    row,
                    reason: "bounds must be finite",
                });
            }
            if max <= min {
                return Err(Error::InvalidParameter {
                    family: Family::Uniform,
                    row,
                    reason: "ST_max must be greater than ST_min",
                });
            }
        }

        Ok(Self { st_min, st_max })
    }

    /// Creates a uniform selection function with the same bounds at every
    /// timestep.
    ///
    /// # Errors
    ///
    /// Returns an error if `timesteps` is zero or the bounds are invalid.
    pub fn constant(st_min: f64, st_max: f64, timesteps: usize) -> Result<Self, Error> {
        Self::new(vec![st_min; timesteps], vec![st_max; timesteps])
    }

    /// Creates a uniform selection function from `[ST_min, ST_max]` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not have two columns or any row is
    /// invalid.
    pub fn from_params(params: ArrayView2<'_, f64>) -> Result<Self, Error> {
        let [st_min, st_max] = params::columns(Family::Uniform, params)?;
        Self::new(st_min, st_max)
    }

    fn cdf(&self, st: f64, timestep: usize) -> f64 {
        let row = params::row(self.st_min.len(), timestep);
        let (min, max) = (self.st_min[row], self.st_max[row]);
        if st >= max {
            1.0
        } else if st > min {
            (st - min) / (max - min)
        } else {
            0.0
        }
    }
}

impl_selection_function!(Uniform);

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rsas_core::SelectionFunction;

    #[test]
    fn linear_between_bounds() {
        let function = Uniform::constant(2.0, 6.0, 1).unwrap();
        let mut probability = [0.0; 5];

        function.cdf_i(&[0.0, 2.0, 3.0, 6.0, 9.0], 0, &mut probability);

        assert_relative_eq!(probability[0], 0.0);
        assert_relative_eq!(probability[1], 0.0);
        assert_relative_eq!(probability[2], 0.25);
        assert_relative_eq!(probability[3], 1.0);
        assert_relative_eq!(probability[4], 1.0);
    }

    #[test]
    fn parameters_vary_in_time() {
        let function = Uniform::new(vec![0.0, 0.0, 1.0], vec![4.0, 8.0, 3.0]).unwrap();
        let mut probability = [0.0; 3];

        function.cdf_all(&[2.0, 2.0, 2.0], &mut probability);

        assert_relative_eq!(probability[0], 0.5);
        assert_relative_eq!(probability[1], 0.25);
        assert_relative_eq!(probability[2], 0.5);
    }

    #[test]
    fn reuses_last_row_past_the_series() {
        let function = Uniform::new(vec![0.0, 0.0], vec![4.0, 8.0]).unwrap();
        let mut probability = [0.0; 4];

        function.cdf_all(&[2.0, 2.0, 2.0, 4.0], &mut probability);
        assert_relative_eq!(probability[2], 0.25);
        assert_relative_eq!(probability[3], 0.5);

        function.cdf_i(&[6.0], 9, &mut probability[..1]);
        assert_relative_eq!(probability[0], 0.75);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let result = Uniform::new(vec![0.0, 5.0], vec![1.0, 5.0]);

        assert!(matches!(
            result,
            Err(Error::InvalidParameter { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = Uniform::new(vec![0.0, 0.0], vec![1.0]);

        assert!(matches!(result, Err(Error::RaggedColumns { .. })));
    }
}
