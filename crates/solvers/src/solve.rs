use rsas_core::Observer;

use crate::{Config, Error, Event, Mode, Problem, Solution, age_major, problem::Setup, time_major};

/// Solves an rSAS transport problem.
///
/// The problem is validated against `mode` and `config` before any buffer is
/// allocated. The observer receives an [`Event`] when the solve starts, as
/// each age row (age-major) or timestep (time-major) completes, and when it
/// finishes.
///
/// A selection function with fewer parameter rows than the inflow series is
/// evaluated with its own rule for later timesteps; the bundled families
/// reuse their last row.
///
/// # Errors
///
/// Returns an error if the inputs are inconsistent, or if the combination of
/// outflow count, mode and config is not supported.
pub fn solve<Obs>(
    problem: &Problem<'_>,
    mode: Mode,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    Obs: for<'a> Observer<Event<'a>>,
{
    let initial_storage = problem.validate(mode, config)?;

    let solution = match problem.fluxes().len() {
        1 => run::<1, _>(problem, initial_storage, mode, config, &mut observer),
        2 => run::<2, _>(problem, initial_storage, mode, config, &mut observer),
        n => return Err(Error::NotImplemented(format!("{n} outflows"))),
    };

    Ok(solution)
}

/// Solves an rSAS transport problem without observer support.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the inputs are inconsistent, or if the combination of
/// outflow count, mode and config is not supported.
pub fn solve_unobserved(
    problem: &Problem<'_>,
    mode: Mode,
    config: &Config,
) -> Result<Solution, Error> {
    solve(problem, mode, config, ())
}

fn run<const F: usize, Obs>(
    problem: &Problem<'_>,
    initial_storage: Vec<f64>,
    mode: Mode,
    config: &Config,
    observer: &mut Obs,
) -> Solution
where
    Obs: for<'a> Observer<Event<'a>>,
{
    let setup = Setup::<F>::new(problem, initial_storage, config);
    match mode {
        Mode::Age => age_major::solve(&setup, config, observer),
        Mode::Time => time_major::solve(&setup, config, observer),
    }
}
