/// A rank StorAge Selection (rSAS) function.
///
/// Given age-ranked storage `ST`, a selection function returns the cumulative
/// probability `Ω(ST)` that outflow is drawn from water of storage rank `ST`
/// or younger. Parameters may vary in time, so every evaluation is tied to a
/// timestep.
///
/// Implementations must return values in `[0, 1]` that are nondecreasing in
/// the storage argument. Solvers rely on this contract but do not check it; a
/// violation shows up as non-monotone transit-time fields and mass-balance
/// residuals.
///
/// Both methods write into a caller-owned buffer of the same length as
/// `storage`, so solvers can reuse their working arrays across sweeps.
pub trait SelectionFunction {
    /// Evaluates a batch of storage values, one per timestep.
    ///
    /// `storage[j]` is evaluated with the parameters of timestep `j`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `probability` is shorter than `storage`
    /// or if `storage` covers more timesteps than the function has parameters.
    fn cdf_all(&self, storage: &[f64], probability: &mut [f64]);

    /// Evaluates a storage profile with the parameters of a single timestep.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `probability` is shorter than `storage`
    /// or if `timestep` is beyond the parameter series.
    fn cdf_i(&self, storage: &[f64], timestep: usize, probability: &mut [f64]);
}

impl<T: SelectionFunction + ?Sized> SelectionFunction for &T {
    fn cdf_all(&self, storage: &[f64], probability: &mut [f64]) {
        (**self).cdf_all(storage, probability);
    }

    fn cdf_i(&self, storage: &[f64], timestep: usize, probability: &mut [f64]) {
        (**self).cdf_i(storage, timestep, probability);
    }
}

impl<T: SelectionFunction + ?Sized> SelectionFunction for Box<T> {
    fn cdf_all(&self, storage: &[f64], probability: &mut [f64]) {
        (**self).cdf_all(storage, probability);
    }

    fn cdf_i(&self, storage: &[f64], timestep: usize, probability: &mut [f64]) {
        (**self).cdf_i(storage, timestep, probability);
    }
}
