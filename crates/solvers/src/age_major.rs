//! Age-major traversal.
//!
//! The outer loop runs over sub-ages and each row is a vector over every
//! sub-time of the run. A row is computed from the one below it: water in bin
//! `m - 1` at sub-time `τ` becomes water in bin `m` at `τ + 1`, less what the
//! outflows drew from it during the substep. Each row runs its fixed-point
//! iterations to completion before the next row starts.

#[cfg(test)]
mod tests;

use std::{array, mem};

use rsas_core::{Observer, SelectionFunction};

use crate::{
    Config, Event, Fields, Mode, Solution,
    grid::Grid,
    problem::Setup,
    transport::{Convolution, evaporation_factor},
};

/// One sub-age row, indexed by sub-time.
///
/// Storage and probability are cumulative up to the row's sub-age; the
/// increments and cumulative outflow belong to the bin just below it.
struct Row<const F: usize> {
    storage: Vec<f64>,
    transit: [Vec<f64>; F],
    increment: Vec<f64>,
    transit_increment: [Vec<f64>; F],
    outflow: [Vec<f64>; F],
}

impl<const F: usize> Row<F> {
    fn zeros(len: usize) -> Self {
        Self {
            storage: vec![0.0; len],
            transit: array::from_fn(|_| vec![0.0; len]),
            increment: vec![0.0; len],
            transit_increment: array::from_fn(|_| vec![0.0; len]),
            outflow: array::from_fn(|_| vec![0.0; len]),
        }
    }

    /// Rebuilds storage and probability after sub-time zero from the
    /// increments. Empty bins carry the probability of the row below.
    fn update_transit(&mut self, below: &Self, selections: &[&dyn SelectionFunction; F], grid: &Grid) {
        let len = self.storage.len();
        for tau in 1..len {
            self.storage[tau] = below.storage[tau] + self.increment[tau];
        }

        for k in 0..F {
            grid.evaluate(selections[k], &self.storage[1..], &mut self.transit[k][1..]);

            for tau in 1..len {
                if self.increment[tau] == 0.0 {
                    self.transit[k][tau] = below.transit[k][tau];
                }
                self.transit_increment[k][tau] = self.transit[k][tau] - below.transit[k][tau];
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
    let sub_times = grid.sub_times();

    observer.observe(&Event::Started {
        mode: Mode::Age,
        max_age: grid.max_age,
        timesteps: grid.timesteps,
        substeps,
        fluxes: F,
    });

    let mut fields = Fields::zeros(grid.max_age, grid.timesteps, F);
    let mut convolution = setup
        .input_concentration
        .map(|input| Convolution::new(input, setup.old_concentration, substeps));

    let initial_transit = setup.initial_transit();
    let initial_increment = grid.spread(&setup.initial_storage);
    let initial_transit_increment: [Vec<f64>; F] =
        array::from_fn(|k| grid.spread(&initial_transit[k]));

    let mut below = Row::<F>::zeros(sub_times + 1);
    let mut row = Row::<F>::zeros(sub_times + 1);
    let mut removed: [Vec<f64>; F] = array::from_fn(|_| vec![0.0; sub_times + 1]);
    let mut running: [Vec<f64>; F] = array::from_fn(|_| vec![0.0; sub_times + 1]);

    // Sub-age zero holds no water; the bin below it is the inflow.
    for k in 0..F {
        grid.evaluate(setup.selections[k], &below.storage[1..], &mut below.transit[k][1..]);
        below.transit[k][0] = initial_transit[k][0];
    }
    for tau in 0..sub_times {
        below.increment[tau] = setup.inflow[grid.timestep_of(tau)] * h;
    }
    write_row(&mut fields, 0, &below, &running, substeps);

    for m in 0..grid.sub_bins() {
        row.increment[0] = initial_increment[m];
        row.storage[0] = below.storage[0] + row.increment[0];
        for k in 0..F {
            row.transit_increment[k][0] = initial_transit_increment[k][m];
            row.transit[k][0] = below.transit[k][0] + row.transit_increment[k][0];
            row.outflow[k][0] = 0.0;
        }

        // Provisional: every cohort ages one sub-bin with nothing removed.
        row.increment[1..].copy_from_slice(&below.increment[..sub_times]);
        row.update_transit(&below, &setup.selections, &grid);

        for _ in 0..config.iterations() {
            for tau in 1..=sub_times {
                let timestep = grid.timestep_of(tau - 1);
                let mut total = 0.0;
                for k in 0..F {
                    let mean_increment =
                        0.5 * (below.transit_increment[k][tau - 1] + row.transit_increment[k][tau]);
                    removed[k][tau] = setup.rates[k][timestep] * h * mean_increment;
                    total += removed[k][tau];
                }
                row.increment[tau] = (below.increment[tau - 1] - total).max(0.0);
            }
            row.update_transit(&below, &setup.selections, &grid);
        }

        for k in 0..F {
            for tau in 1..=sub_times {
                row.outflow[k][tau] = below.outflow[k][tau - 1] + removed[k][tau];
            }
            for (total, outflow) in running[k].iter_mut().zip(&row.outflow[k]) {
                *total += outflow;
            }
        }

        if let Some(convolution) = &mut convolution {
            // Bin m holds inflow from substep tau - m onwards.
            for tau in m..sub_times {
                let entry = grid.timestep_of(tau - m);
                let weight =
                    0.5 * (below.transit_increment[0][tau] + row.transit_increment[0][tau + 1]);
                let factor = if setup.evapoconcentration {
                    evaporation_factor(
                        setup.inflow[entry] * h,
                        row.outflow[0][tau + 1] + row.increment[tau + 1],
                    )
                } else {
                    1.0
                };
                convolution.add(grid.timestep_of(tau), entry, weight, factor);
            }
        }

        mem::swap(&mut below, &mut row);

        if (m + 1) % substeps == 0 {
            let age = (m + 1) / substeps;
            write_row(&mut fields, age, &below, &running, substeps);
            observer.observe(&Event::AgeCompleted {
                age,
                max_age: grid.max_age,
                storage: fields.storage.row(age),
            });
        }
    }

    for time in 0..=grid.timesteps {
        fields.derive_partitions(time, setup.inflow, &setup.initial_storage, setup.dt);
    }

    observer.observe(&Event::Finished { mode: Mode::Age });

    Solution {
        fields: Some(fields),
        concentration: convolution.map(Convolution::finish),
    }
}

/// Samples a sub-age row at the end of every timestep.
fn write_row<const F: usize>(
    fields: &mut Fields,
    age: usize,
    row: &Row<F>,
    running: &[Vec<f64>; F],
    substeps: usize,
) {
    for time in 0..=fields.timesteps() {
        let tau = time * substeps;
        fields.storage[[age, time]] = row.storage[tau];
        for (k, flux) in fields.fluxes.iter_mut().enumerate() {
            flux.transit[[age, time]] = row.transit[k][tau];
            flux.outflow[[age, time]] = running[k][tau];
        }
    }
}
