//! Outflow concentration from transit-time distributions.
//!
//! Each timestep's outflow is a mixture of inflow cohorts. The weight of the
//! cohort in age bin `a` is the trapezoidal average of its transit-time
//! increment at the start and end of the timestep, and it carries the input
//! concentration of the timestep it entered. The weights sum to the
//! *observed fraction*: the share of outflow whose age the solve resolves.
//! The remainder is older than the initial storage profile and is assigned
//! `C_old` when one is given.

use ndarray::ArrayView2;

use crate::Concentration;

/// Computes the outflow concentration from a full transit-time field.
///
/// `transit` is a flux's `PQ[a, t]` field and `input` has one concentration
/// per timestep.
///
/// # Panics
///
/// Panics if `input` does not have one value per timestep of `transit`.
#[must_use]
pub fn transport(transit: ArrayView2<'_, f64>, input: &[f64], old: Option<f64>) -> Concentration {
    convolve(transit, input, old, |_, _| 1.0)
}

/// Computes the outflow concentration when part of the water leaves without
/// solute.
///
/// Each cohort's concentration is scaled by the ratio of its inflow volume to
/// the volume still holding its solute, `1 / (theta + theta_storage)`, where
/// `theta` belongs to the solute-carrying flux. Cohorts with nothing left
/// contribute nothing.
///
/// # Panics
///
/// Panics if `input` does not have one value per timestep of `transit`, or the
/// fields differ in shape.
#[must_use]
pub fn transport_with_evapoconcentration(
    transit: ArrayView2<'_, f64>,
    theta: ArrayView2<'_, f64>,
    theta_storage: ArrayView2<'_, f64>,
    input: &[f64],
    old: Option<f64>,
) -> Concentration {
    assert_eq!(theta.dim(), transit.dim(), "theta shape");
    assert_eq!(theta_storage.dim(), transit.dim(), "theta_storage shape");

    convolve(transit, input, old, |age, time| {
        evaporation_factor(1.0, theta[[age, time]] + theta_storage[[age, time]])
    })
}

fn convolve(
    transit: ArrayView2<'_, f64>,
    input: &[f64],
    old: Option<f64>,
    factor: impl Fn(usize, usize) -> f64,
) -> Concentration {
    let (rows, cols) = transit.dim();
    let timesteps = cols.saturating_sub(1);
    assert_eq!(input.len(), timesteps, "one input concentration per timestep");

    let increment = |age: usize, time: usize| {
        if age == 0 {
            0.0
        } else {
            transit[[age, time]] - transit[[age - 1, time]]
        }
    };

    let mut convolution = Convolution::new(input, old, 1);
    for timestep in 0..timesteps {
        let time = timestep + 1;
        for age in 1..rows.min(time + 1) {
            let weight = 0.5 * (increment(age, time) + increment(age - 1, timestep));
            convolution.add(timestep, time - age, weight, factor(age, time));
        }
    }
    convolution.finish()
}

/// Scale applied to a cohort's concentration when water leaves without it.
pub(crate) fn evaporation_factor(entered: f64, remaining: f64) -> f64 {
    if remaining > 0.0 {
        entered / remaining
    } else {
        0.0
    }
}

/// Running convolution filled in by the solvers as they sweep the grid.
pub(crate) struct Convolution<'a> {
    input: &'a [f64],
    old: Option<f64>,
    scale: f64,
    modeled: Vec<f64>,
    observed: Vec<f64>,
}

impl<'a> Convolution<'a> {
    /// Creates an empty convolution; each contribution is divided by
    /// `substeps`.
    pub fn new(input: &'a [f64], old: Option<f64>, substeps: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / substeps as f64;

        Self {
            input,
            old,
            scale,
            modeled: vec![0.0; input.len()],
            observed: vec![0.0; input.len()],
        }
    }

    /// Adds a cohort that entered during `entry` and makes up `weight` of the
    /// outflow during `timestep`.
    pub fn add(&mut self, timestep: usize, entry: usize, weight: f64, factor: f64) {
        let weight = weight * self.scale;
        self.modeled[timestep] += weight * self.input[entry] * factor;
        self.observed[timestep] += weight;
    }

    /// Returns `C_out` for `timestep`.
    pub fn output(&self, timestep: usize) -> f64 {
        let modeled = self.modeled[timestep];
        match self.old {
            Some(old) => modeled + old * (1.0 - self.observed[timestep]),
            None => modeled,
        }
    }

    pub fn finish(self) -> Concentration {
        let output = (0..self.modeled.len()).map(|t| self.output(t)).collect();
        Concentration {
            output,
            modeled: self.modeled,
            observed_fraction: self.observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn trapezoid_weights_and_old_water() {
        // Half the first timestep's outflow is resolved.
        let transit = array![[0.0, 0.0], [1.0, 1.0]];

        let without_old = transport(transit.view(), &[4.0], None);
        assert_relative_eq!(without_old.modeled[0], 2.0);
        assert_relative_eq!(without_old.observed_fraction[0], 0.5);
        assert_relative_eq!(without_old.output[0], 2.0);

        let with_old = transport(transit.view(), &[4.0], Some(2.0));
        assert_relative_eq!(with_old.output[0], 3.0);
    }

    #[test]
    fn cohorts_carry_their_entry_concentration() {
        // All outflow of timestep 1 comes from the cohort of timestep 0.
        let transit = array![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]];

        let concentration = transport(transit.view(), &[5.0, 7.0], None);

        assert_relative_eq!(concentration.modeled[1], 2.5);
        assert_relative_eq!(concentration.observed_fraction[1], 0.5);
    }

    #[test]
    fn evapoconcentration_scales_by_remaining_fraction() {
        let transit = array![[0.0, 0.0], [1.0, 1.0]];
        let theta = array![[0.0, 0.0], [0.0, 0.25]];
        let theta_storage = array![[0.0, 0.0], [0.0, 0.25]];

        let concentration = transport_with_evapoconcentration(
            transit.view(),
            theta.view(),
            theta_storage.view(),
            &[4.0],
            None,
        );

        assert_relative_eq!(concentration.modeled[0], 4.0);
        assert_relative_eq!(concentration.observed_fraction[0], 0.5);
    }

    #[test]
    fn nothing_left_contributes_nothing() {
        assert_relative_eq!(evaporation_factor(1.0, 0.0), 0.0);
        assert_relative_eq!(evaporation_factor(1.0, 0.5), 2.0);
    }

    #[test]
    fn substeps_scale_contributions() {
        let mut convolution = Convolution::new(&[2.0], Some(1.0), 4);
        for _ in 0..4 {
            convolution.add(0, 0, 0.5, 1.0);
        }

        assert_relative_eq!(convolution.output(0), 1.0 + 0.5);
        let concentration = convolution.finish();
        assert_relative_eq!(concentration.observed_fraction[0], 0.5);
    }
}
