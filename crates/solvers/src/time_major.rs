//! Time-major traversal.
//!
//! The outer loop runs over substeps and each substep updates the whole
//! sub-age profile at once: increments roll forward one sub-bin, new inflow
//! enters at sub-age zero, and every bin runs its fixed-point iterations
//! together. Only the current and previous profiles are kept, so the full
//! fields are optional.

#[cfg(test)]
mod tests;

use std::{array, mem};

use ndarray::ArrayView1;
use rsas_core::{Observer, SelectionFunction};

use crate::{
    Config, Event, Fields, Mode, Solution,
    problem::Setup,
    transport::{Convolution, evaporation_factor},
};

/// Age profile at the end of a substep.
///
/// `storage` and `transit` are cumulative over sub-ages `0..=bins`; the
/// increments and cumulative outflow are per sub-bin.
struct Profile<const F: usize> {
    storage: Vec<f64>,
    transit: [Vec<f64>; F],
    increment: Vec<f64>,
    transit_increment: [Vec<f64>; F],
    outflow: [Vec<f64>; F],
}

impl<const F: usize> Profile<F> {
    fn zeros(bins: usize) -> Self {
        Self {
            storage: vec![0.0; bins + 1],
            transit: array::from_fn(|_| vec![0.0; bins + 1]),
            increment: vec![0.0; bins],
            transit_increment: array::from_fn(|_| vec![0.0; bins]),
            outflow: array::from_fn(|_| vec![0.0; bins]),
        }
    }

    /// Rebuilds storage and probability from the increments. Empty bins carry
    /// the probability of the bin below.
    fn update_transit(&mut self, selections: &[&dyn SelectionFunction; F], timestep: usize) {
        for (m, increment) in self.increment.iter().enumerate() {
            self.storage[m + 1] = self.storage[m] + increment;
        }

        for k in 0..F {
            selections[k].cdf_i(&self.storage, timestep, &mut self.transit[k]);

            let transit = &mut self.transit[k];
            for (m, &increment) in self.increment.iter().enumerate() {
                if increment == 0.0 {
                    transit[m + 1] = transit[m];
                }
                self.transit_increment[k][m] = transit[m + 1] - transit[m];
            }
        }
    }
}

pub(crate) fn solve<const F: usize, Obs>(
    setup: &Setup<'_, F>,
    config: &Config,
    observer: &mut Obs,
) -> Solution
where
    Obs: for<'a> Observer<Event<'a>>,
{
    let grid = setup.grid(config.substeps());
    let (substeps, h) = (grid.substeps, grid.h);
    let bins = grid.sub_bins();

    observer.observe(&Event::Started {
        mode: Mode::Time,
        max_age: grid.max_age,
        timesteps: grid.timesteps,
        substeps,
        fluxes: F,
    });

    let mut fields = config
        .full_outputs()
        .then(|| Fields::zeros(grid.max_age, grid.timesteps, F));
    let mut convolution = setup
        .input_concentration
        .map(|input| Convolution::new(input, setup.old_concentration, substeps));

    let initial_transit = setup.initial_transit();
    if let Some(fields) = &mut fields {
        fields
            .storage
            .column_mut(0)
            .assign(&ArrayView1::from(setup.initial_storage.as_slice()));
        for (flux, transit) in fields.fluxes.iter_mut().zip(&initial_transit) {
            flux.transit
                .column_mut(0)
                .assign(&ArrayView1::from(transit.as_slice()));
        }
        fields.derive_partitions(0, setup.inflow, &setup.initial_storage, setup.dt);
    }

    let mut previous = Profile::<F>::zeros(bins);
    let mut current = Profile::<F>::zeros(bins);
    previous.increment = grid.spread(&setup.initial_storage);
    for (increment, transit) in previous.transit_increment.iter_mut().zip(&initial_transit) {
        *increment = grid.spread(transit);
    }

    let mut seed = vec![0.0; bins];
    let mut removed: [Vec<f64>; F] = array::from_fn(|_| vec![0.0; bins]);

    for tau in 0..grid.sub_times() {
        let timestep = grid.timestep_of(tau);

        // Provisional: every cohort ages one sub-bin with nothing removed.
        seed[0] = setup.inflow[timestep] * h;
        seed[1..].copy_from_slice(&previous.increment[..bins - 1]);
        current.increment.copy_from_slice(&seed);
        current.update_transit(&setup.selections, timestep);

        for _ in 0..config.iterations() {
            for m in 0..bins {
                let mut total = 0.0;
                for k in 0..F {
                    let before = if m == 0 {
                        0.0
                    } else {
                        previous.transit_increment[k][m - 1]
                    };
                    let mean_increment = 0.5 * (before + current.transit_increment[k][m]);
                    removed[k][m] = setup.rates[k][timestep] * h * mean_increment;
                    total += removed[k][m];
                }
                current.increment[m] = (seed[m] - total).max(0.0);
            }
            current.update_transit(&setup.selections, timestep);
        }

        for k in 0..F {
            current.outflow[k][0] = removed[k][0];
            for m in 1..bins {
                current.outflow[k][m] = previous.outflow[k][m - 1] + removed[k][m];
            }
        }

        if let Some(convolution) = &mut convolution {
            // Bins above tau still hold initial storage.
            for m in 0..bins.min(tau + 1) {
                let entry = grid.timestep_of(tau - m);
                let before = if m == 0 {
                    0.0
                } else {
                    previous.transit_increment[0][m - 1]
                };
                let weight = 0.5 * (before + current.transit_increment[0][m]);
                let factor = if setup.evapoconcentration {
                    evaporation_factor(
                        setup.inflow[entry] * h,
                        current.outflow[0][m] + current.increment[m],
                    )
                } else {
                    1.0
                };
                convolution.add(timestep, entry, weight, factor);
            }
        }

        mem::swap(&mut previous, &mut current);

        if (tau + 1) % substeps == 0 {
            let time = timestep + 1;
            if let Some(fields) = &mut fields {
                write_column(fields, time, &previous, substeps);
                fields.derive_partitions(time, setup.inflow, &setup.initial_storage, setup.dt);
            }
            observer.observe(&Event::StepCompleted {
                timestep,
                timesteps: grid.timesteps,
                storage: ArrayView1::from(previous.storage.as_slice()),
                concentration: convolution.as_ref().map(|c| c.output(timestep)),
            });
        }
    }

    observer.observe(&Event::Finished { mode: Mode::Time });

    Solution {
        fields,
        concentration: convolution.map(Convolution::finish),
    }
}

/// Samples a sub-age profile at every age.
fn write_column<const F: usize>(
    fields: &mut Fields,
    time: usize,
    profile: &Profile<F>,
    substeps: usize,
) {
    for age in 0..=fields.max_age() {
        fields.storage[[age, time]] = profile.storage[age * substeps];
    }

    for (k, flux) in fields.fluxes.iter_mut().enumerate() {
        flux.transit[[0, time]] = profile.transit[k][0];
        flux.outflow[[0, time]] = 0.0;

        let mut total = 0.0;
        for (m, outflow) in profile.outflow[k].iter().enumerate() {
            total += outflow;
            if (m + 1) % substeps == 0 {
                let age = (m + 1) / substeps;
                flux.transit[[age, time]] = profile.transit[k][m + 1];
                flux.outflow[[age, time]] = total;
            }
        }
    }
}
