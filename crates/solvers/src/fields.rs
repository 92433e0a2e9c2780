use ndarray::Array2;

/// Full `(age, time)` fields of a solve, each `(M + 1) × (N + 1)`.
///
/// Rows are ages `0..=M` and columns are times `0..=N`, in units of `dt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    /// Age-ranked storage `ST[a, t]`: volume of age `<= a` at time `t`.
    pub storage: Array2<f64>,

    /// Per-outflow fields, in flux order.
    pub fluxes: Vec<FluxFields>,

    /// Fraction of each inflow cohort still in storage (`thetaS`).
    pub theta_storage: Array2<f64>,

    /// Initial cohort volume minus storage and all outflows, per age bin.
    pub mass_balance: Array2<f64>,
}

/// Fields belonging to one outflow.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxFields {
    /// Cumulative transit-time distribution `PQ[a, t]`.
    pub transit: Array2<f64>,

    /// Cumulative volume `Qout[a, t]` that has left up to time `t` from
    /// water of age `<= a` at time `t`.
    pub outflow: Array2<f64>,

    /// Fraction of each inflow cohort that has left through this outflow.
    pub theta: Array2<f64>,
}

impl Fields {
    pub(crate) fn zeros(max_age: usize, timesteps: usize, fluxes: usize) -> Self {
        let shape = (max_age + 1, timesteps + 1);
        Self {
            storage: Array2::zeros(shape),
            fluxes: (0..fluxes)
                .map(|_| FluxFields {
                    transit: Array2::zeros(shape),
                    outflow: Array2::zeros(shape),
                    theta: Array2::zeros(shape),
                })
                .collect(),
            theta_storage: Array2::zeros(shape),
            mass_balance: Array2::zeros(shape),
        }
    }

    /// Number of ages past zero.
    #[must_use]
    pub fn max_age(&self) -> usize {
        self.storage.nrows() - 1
    }

    /// Number of timesteps.
    #[must_use]
    pub fn timesteps(&self) -> usize {
        self.storage.ncols() - 1
    }

    /// Derives `theta_k`, `thetaS` and the mass balance of column `time`
    /// from its storage and outflow.
    ///
    /// Bin `a` at time `t` holds the inflow of timestep `t - a` when `a <= t`,
    /// and otherwise the initial storage that has aged `t` timesteps.
    pub(crate) fn derive_partitions(
        &mut self,
        time: usize,
        inflow: &[f64],
        initial_storage: &[f64],
        dt: f64,
    ) {
        for age in 1..=self.max_age() {
            let stored = self.storage[[age, time]] - self.storage[[age - 1, time]];

            let entered = if age <= time {
                inflow[time - age] * dt
            } else {
                initial_storage[age - time] - initial_storage[age - time - 1]
            };
            let tracked = age <= time && entered != 0.0;

            let mut balance = entered - stored;
            for flux in &mut self.fluxes {
                let left = flux.outflow[[age, time]] - flux.outflow[[age - 1, time]];
                balance -= left;
                if tracked {
                    flux.theta[[age, time]] = left / entered;
                }
            }
            if tracked {
                self.theta_storage[[age, time]] = stored / entered;
            }
            self.mass_balance[[age, time]] = balance;
        }
    }
}
