use std::array;

use rsas_core::SelectionFunction;

use crate::{Config, Error, Mode, grid::Grid};

/// An outflow series paired with the selection function that draws it.
#[derive(Clone, Copy)]
pub struct Flux<'a> {
    /// Outflow rate per timestep.
    pub rate: &'a [f64],

    /// Selection function governing which ages the outflow draws.
    pub selection: &'a dyn SelectionFunction,
}

/// Inputs to an rSAS transport solve.
///
/// A problem borrows its series. Build one with [`Problem::new`] and the
/// `with_*` methods; all checks happen in [`solve`](crate::solve).
#[derive(Clone)]
pub struct Problem<'a> {
    inflow: &'a [f64],
    dt: f64,
    fluxes: Vec<Flux<'a>>,
    initial_storage: Option<&'a [f64]>,
    input_concentration: Option<&'a [f64]>,
    old_concentration: Option<f64>,
}

impl<'a> Problem<'a> {
    /// Creates a problem with an inflow series and a timestep length.
    #[must_use]
    pub fn new(inflow: &'a [f64], dt: f64) -> Self {
        Self {
            inflow,
            dt,
            fluxes: Vec::new(),
            initial_storage: None,
            input_concentration: None,
            old_concentration: None,
        }
    }

    /// Adds an outflow drawn by `selection`.
    ///
    /// The first outflow added is flux 1, the only one that carries solute
    /// when evapoconcentration is enabled.
    #[must_use]
    pub fn with_outflow(mut self, rate: &'a [f64], selection: &'a dyn SelectionFunction) -> Self {
        self.fluxes.push(Flux { rate, selection });
        self
    }

    /// Adds outflows from parallel lists of rates and selection functions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FunctionCount`] if the lists differ in length.
    pub fn with_outflows(
        mut self,
        rates: &[&'a [f64]],
        selections: &[&'a dyn SelectionFunction],
    ) -> Result<Self, Error> {
        if rates.len() != selections.len() {
            return Err(Error::FunctionCount {
                outflows: rates.len(),
                functions: selections.len(),
            });
        }

        self.fluxes.extend(
            rates
                .iter()
                .zip(selections)
                .map(|(&rate, &selection)| Flux { rate, selection }),
        );
        Ok(self)
    }

    /// Sets the initial age-ranked storage, one value per age from zero.
    ///
    /// Defaults to an empty store covering `N + 1` ages.
    #[must_use]
    pub fn with_initial_storage(mut self, initial_storage: &'a [f64]) -> Self {
        self.initial_storage = Some(initial_storage);
        self
    }

    /// Sets the inflow concentration series.
    #[must_use]
    pub fn with_input_concentration(mut self, input_concentration: &'a [f64]) -> Self {
        self.input_concentration = Some(input_concentration);
        self
    }

    /// Sets the concentration of water older than the initial storage
    /// profile, applied to the outflow fraction the solve does not resolve.
    #[must_use]
    pub fn with_old_concentration(mut self, old_concentration: f64) -> Self {
        self.old_concentration = Some(old_concentration);
        self
    }

    /// Returns the inflow series.
    #[must_use]
    pub fn inflow(&self) -> &'a [f64] {
        self.inflow
    }

    /// Returns the timestep length.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the outflows in flux order.
    #[must_use]
    pub fn fluxes(&self) -> &[Flux<'a>] {
        &self.fluxes
    }

    /// Returns the number of timesteps.
    #[must_use]
    pub fn timesteps(&self) -> usize {
        self.inflow.len()
    }

    /// Checks the problem against `mode` and `config`.
    ///
    /// Returns the initial storage profile to use, with zero-age storage
    /// coerced to zero.
    pub(crate) fn validate(&self, mode: Mode, config: &Config) -> Result<Vec<f64>, Error> {
        let timesteps = self.inflow.len();
        if timesteps == 0 {
            return Err(Error::EmptyInflow);
        }
        check_finite("J", self.inflow)?;

        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::InvalidTimestep(self.dt));
        }

        match self.fluxes.len() {
            0 => return Err(Error::NoOutflows),
            1 | 2 => {}
            n => {
                return Err(Error::NotImplemented(format!("{n} outflows")));
            }
        }
        for (k, flux) in self.fluxes.iter().enumerate() {
            let series = format!("Q{}", k + 1);
            check_length(&series, flux.rate, timesteps)?;
            check_finite(&series, flux.rate)?;
        }

        if let Some(c_in) = self.input_concentration {
            check_length("C_in", c_in, timesteps)?;
            check_finite("C_in", c_in)?;
        }
        if let Some(c_old) = self.old_concentration
            && !c_old.is_finite()
        {
            return Err(Error::NonFinite {
                series: "C_old".into(),
                index: 0,
            });
        }

        if config.evapoconcentration() {
            if self.fluxes.len() != 2 {
                return Err(Error::EvapoconcentrationOutflows(self.fluxes.len()));
            }
            if self.input_concentration.is_none() {
                return Err(Error::MissingConcentration("evapoconcentration"));
            }
        }
        if !config.full_outputs() {
            if mode == Mode::Age {
                return Err(Error::NotImplemented(
                    "reduced-memory output for age-major traversal".into(),
                ));
            }
            if self.input_concentration.is_none() {
                return Err(Error::MissingConcentration("reduced-memory output"));
            }
        }

        self.initial_storage()
    }

    fn initial_storage(&self) -> Result<Vec<f64>, Error> {
        let Some(initial) = self.initial_storage else {
            return Ok(vec![0.0; self.inflow.len() + 1]);
        };

        if initial.len() < 2 {
            return Err(Error::InitialStorageTooShort(initial.len()));
        }
        check_finite("ST_init", initial)?;

        let mut storage = initial.to_vec();
        #[allow(clippy::float_cmp)]
        let nonzero_origin = storage[0] != 0.0;
        if nonzero_origin {
            log::warn!("ST_init[0] = {} coerced to 0", storage[0]);
            storage[0] = 0.0;
        }
        if let Some(index) = storage.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::DecreasingInitialStorage { index: index + 1 });
        }

        Ok(storage)
    }
}

fn check_length(series: &str, values: &[f64], expected: usize) -> Result<(), Error> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            series: series.into(),
            expected,
            actual: values.len(),
        })
    }
}

fn check_finite(series: &str, values: &[f64]) -> Result<(), Error> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(Error::NonFinite {
            series: series.into(),
            index,
        }),
        None => Ok(()),
    }
}

/// A validated problem with a fixed number of outflows.
pub(crate) struct Setup<'a, const F: usize> {
    pub inflow: &'a [f64],
    pub rates: [&'a [f64]; F],
    pub selections: [&'a dyn SelectionFunction; F],
    pub initial_storage: Vec<f64>,
    pub dt: f64,
    pub input_concentration: Option<&'a [f64]>,
    pub old_concentration: Option<f64>,
    pub evapoconcentration: bool,
}

impl<'a, const F: usize> Setup<'a, F> {
    /// Fixes the outflow count of a problem that passed validation with `F`
    /// outflows.
    pub fn new(problem: &Problem<'a>, initial_storage: Vec<f64>, config: &Config) -> Self {
        debug_assert_eq!(problem.fluxes.len(), F);

        Self {
            inflow: problem.inflow,
            rates: array::from_fn(|k| problem.fluxes[k].rate),
            selections: array::from_fn(|k| problem.fluxes[k].selection),
            initial_storage,
            dt: problem.dt,
            input_concentration: problem.input_concentration,
            old_concentration: problem.old_concentration,
            evapoconcentration: config.evapoconcentration(),
        }
    }

    pub fn grid(&self, substeps: usize) -> Grid {
        Grid::new(
            self.initial_storage.len() - 1,
            self.inflow.len(),
            substeps,
            self.dt,
        )
    }

    /// Probability of the initial storage profile under each selection
    /// function, at the first timestep.
    pub fn initial_transit(&self) -> [Vec<f64>; F] {
        array::from_fn(|k| {
            let mut transit = vec![0.0; self.initial_storage.len()];
            self.selections[k].cdf_i(&self.initial_storage, 0, &mut transit);
            transit
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Linear;

    impl SelectionFunction for Linear {
        fn cdf_all(&self, storage: &[f64], probability: &mut [f64]) {
            self.cdf_i(storage, 0, probability);
        }

        fn cdf_i(&self, storage: &[f64], _timestep: usize, probability: &mut [f64]) {
            for (p, &st) in probability.iter_mut().zip(storage) {
                *p = (st / 10.0).clamp(0.0, 1.0);
            }
        }
    }

    const J: [f64; 3] = [1.0, 2.0, 1.0];
    const Q: [f64; 3] = [1.0, 1.0, 1.0];

    fn validate(problem: &Problem<'_>) -> Result<Vec<f64>, Error> {
        problem.validate(Mode::Time, &Config::default())
    }

    #[test]
    fn defaults_initial_storage_to_zeros() {
        let problem = Problem::new(&J, 1.0).with_outflow(&Q, &Linear);

        assert_eq!(validate(&problem).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn coerces_zero_age_storage() {
        let initial = [0.5, 1.0, 2.0];
        let problem = Problem::new(&J, 1.0)
            .with_outflow(&Q, &Linear)
            .with_initial_storage(&initial);

        assert_eq!(validate(&problem).unwrap(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn rejects_bad_inputs() {
        let short = [1.0, 1.0];
        let problem = Problem::new(&J, 1.0).with_outflow(&short, &Linear);
        assert!(matches!(
            validate(&problem),
            Err(Error::LengthMismatch { expected: 3, actual: 2, .. })
        ));

        let problem = Problem::new(&[], 1.0).with_outflow(&Q, &Linear);
        assert_eq!(validate(&problem), Err(Error::EmptyInflow));

        let problem = Problem::new(&J, 0.0).with_outflow(&Q, &Linear);
        assert_eq!(validate(&problem), Err(Error::InvalidTimestep(0.0)));

        let nan = [1.0, f64::NAN, 1.0];
        let problem = Problem::new(&J, 1.0).with_outflow(&nan, &Linear);
        assert!(matches!(validate(&problem), Err(Error::NonFinite { index: 1, .. })));

        let problem = Problem::new(&J, 1.0);
        assert_eq!(validate(&problem), Err(Error::NoOutflows));
    }

    #[test]
    fn rejects_bad_initial_storage() {
        let one = [0.0];
        let problem = Problem::new(&J, 1.0)
            .with_outflow(&Q, &Linear)
            .with_initial_storage(&one);
        assert_eq!(validate(&problem), Err(Error::InitialStorageTooShort(1)));

        let decreasing = [0.0, 2.0, 1.0];
        let problem = Problem::new(&J, 1.0)
            .with_outflow(&Q, &Linear)
            .with_initial_storage(&decreasing);
        assert_eq!(
            validate(&problem),
            Err(Error::DecreasingInitialStorage { index: 2 })
        );
    }

    #[test]
    fn pairs_outflows_with_functions() {
        let result = Problem::new(&J, 1.0).with_outflows(&[&Q, &Q], &[&Linear]);
        assert!(matches!(
            result,
            Err(Error::FunctionCount { outflows: 2, functions: 1 })
        ));

        let problem = Problem::new(&J, 1.0)
            .with_outflows(&[&Q, &Q, &Q], &[&Linear, &Linear, &Linear])
            .unwrap();
        assert!(matches!(validate(&problem), Err(Error::NotImplemented(_))));
    }

    #[test]
    fn unsupported_configurations() {
        let c_in = [1.0; 3];
        let evapo = Config::default().with_evapoconcentration(true);
        let reduced = Config::default().with_full_outputs(false);

        let problem = Problem::new(&J, 1.0)
            .with_outflow(&Q, &Linear)
            .with_input_concentration(&c_in);
        assert_eq!(
            problem.validate(Mode::Time, &evapo),
            Err(Error::EvapoconcentrationOutflows(1))
        );
        assert!(matches!(
            problem.validate(Mode::Age, &reduced),
            Err(Error::NotImplemented(_))
        ));
        assert!(problem.validate(Mode::Time, &reduced).is_ok());

        let problem = Problem::new(&J, 1.0)
            .with_outflow(&Q, &Linear)
            .with_outflow(&Q, &Linear);
        assert_eq!(
            problem.validate(Mode::Time, &evapo),
            Err(Error::MissingConcentration("evapoconcentration"))
        );
        assert_eq!(
            problem.validate(Mode::Time, &reduced),
            Err(Error::MissingConcentration("reduced-memory output"))
        );
    }
}
