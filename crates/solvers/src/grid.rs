use rsas_core::SelectionFunction;

/// Dimensions of the `(age, time)` grid and its substep refinement.
///
/// Ages run `0..=max_age` and times `0..=timesteps` on the output grid. The
/// solvers work on a finer grid of sub-bins (`max_age * substeps` of them)
/// and sub-times (`timesteps * substeps` substeps of length `h`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Grid {
    pub max_age: usize,
    pub timesteps: usize,
    pub substeps: usize,
    pub h: f64,
}

impl Grid {
    pub fn new(max_age: usize, timesteps: usize, substeps: usize, dt: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let h = dt / substeps as f64;

        Self {
            max_age,
            timesteps,
            substeps,
            h,
        }
    }

    /// Number of sub-age bins.
    pub fn sub_bins(&self) -> usize {
        self.max_age * self.substeps
    }

    /// Number of substeps in the whole run.
    pub fn sub_times(&self) -> usize {
        self.timesteps * self.substeps
    }

    /// Timestep containing substep `tau` (the step from `tau` to `tau + 1`).
    pub fn timestep_of(&self, tau: usize) -> usize {
        tau / self.substeps
    }

    /// Spreads each increment of a cumulative age profile evenly over the
    /// sub-bins of its age bin.
    pub fn spread(&self, cumulative: &[f64]) -> Vec<f64> {
        #[allow(clippy::cast_precision_loss)]
        let substeps = self.substeps as f64;

        cumulative
            .windows(2)
            .flat_map(|w| std::iter::repeat_n((w[1] - w[0]) / substeps, self.substeps))
            .collect()
    }

    /// Evaluates a selection function on storage at consecutive substeps,
    /// each with the parameters of its own timestep.
    ///
    /// `storage[j]` is the value at the end of substep `j`.
    pub fn evaluate(
        &self,
        selection: &dyn SelectionFunction,
        storage: &[f64],
        probability: &mut [f64],
    ) {
        if self.substeps == 1 {
            selection.cdf_all(storage, probability);
            return;
        }

        let chunks = storage
            .chunks(self.substeps)
            .zip(probability.chunks_mut(self.substeps));
        for (timestep, (storage, probability)) in chunks.enumerate() {
            selection.cdf_i(storage, timestep, probability);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// Probability equals the timestep index, so evaluation order is visible.
    struct Timestep;

    impl SelectionFunction for Timestep {
        fn cdf_all(&self, _storage: &[f64], probability: &mut [f64]) {
            for (j, p) in probability.iter_mut().enumerate() {
                *p = j as f64;
            }
        }

        fn cdf_i(&self, _storage: &[f64], timestep: usize, probability: &mut [f64]) {
            probability.fill(timestep as f64);
        }
    }

    #[test]
    fn sizes() {
        let grid = Grid::new(4, 3, 2, 1.0);

        assert_eq!(grid.sub_bins(), 8);
        assert_eq!(grid.sub_times(), 6);
        assert_eq!(grid.timestep_of(5), 2);
        assert_relative_eq!(grid.h, 0.5);
    }

    #[test]
    fn spreads_increments_over_sub_bins() {
        let grid = Grid::new(2, 1, 2, 1.0);

        let sub = grid.spread(&[0.0, 1.0, 4.0]);

        assert_eq!(sub, vec![0.5, 0.5, 1.5, 1.5]);
    }

    #[test]
    fn evaluates_with_parameters_of_each_timestep() {
        let storage = [0.0; 6];
        let mut probability = [0.0; 6];

        Grid::new(1, 3, 2, 1.0).evaluate(&Timestep, &storage, &mut probability);
        assert_eq!(probability, [0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);

        Grid::new(1, 6, 1, 1.0).evaluate(&Timestep, &storage, &mut probability);
        assert_eq!(probability, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
