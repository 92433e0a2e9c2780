use approx::assert_relative_eq;
use rsas_functions::Uniform;

use crate::{Config, Event, Key, Mode, Problem, solve, solve_unobserved};

#[test]
fn single_cell_matches_hand_calculation() {
    let selection = Uniform::constant(0.0, 10.0, 1).unwrap();
    let problem = Problem::new(&[1.0], 1.0).with_outflow(&[1.0], &selection);

    let solution = solve_unobserved(&problem, Mode::Time, &Config::default()).unwrap();

    let storage = solution.get(Key::Storage).unwrap();
    let outflow = solution.get(Key::Outflow(1)).unwrap();
    let transit = solution.get(Key::Transit(1)).unwrap();
    assert_relative_eq!(storage[[1, 1]], 0.952_375, epsilon = 1e-12);
    assert_relative_eq!(outflow[[1, 1]], 0.047_625, epsilon = 1e-12);
    assert_relative_eq!(transit[[1, 1]], 0.095_237_5, epsilon = 1e-12);
}

#[test]
fn steady_inflow_reaches_geometric_profile() {
    let selection = Uniform::constant(0.0, 1.0, 4).unwrap();
    let problem = Problem::new(&[1.0; 4], 1.0).with_outflow(&[1.0; 4], &selection);

    let solution = solve_unobserved(&problem, Mode::Time, &Config::default()).unwrap();
    let storage = solution.get(Key::Storage).unwrap();
    let outflow = solution.get(Key::Outflow(1)).unwrap();

    // Each age bin holds 0.375 of the one below it.
    let expected = [0.0, 0.625, 0.859_375, 0.947_265_625, 0.980_224_609_375];
    for age in 1..=4 {
        for time in age..=4 {
            assert_relative_eq!(storage[[age, time]], expected[age], epsilon = 1e-12);
        }
    }
    // Everything that entered and is not stored has left.
    assert_relative_eq!(outflow[[4, 4]], 4.0 - expected[4], epsilon = 1e-12);
}

#[test]
fn first_column_is_initial_condition() {
    let selection = Uniform::constant(0.0, 4.0, 2).unwrap();
    let initial = [0.0, 1.0, 3.0];
    let problem = Problem::new(&[1.0, 1.0], 1.0)
        .with_outflow(&[1.0, 1.0], &selection)
        .with_initial_storage(&initial);

    let solution = solve_unobserved(&problem, Mode::Time, &Config::new(3, 3).unwrap()).unwrap();
    let fields = solution.fields.unwrap();

    for (age, &value) in initial.iter().enumerate() {
        assert_relative_eq!(fields.storage[[age, 0]], value);
        assert_relative_eq!(fields.fluxes[0].transit[[age, 0]], value / 4.0);
        assert_relative_eq!(fields.fluxes[0].outflow[[age, 0]], 0.0);
    }
}

#[test]
fn reduced_memory_matches_full_output() {
    let selection = Uniform::constant(0.0, 6.0, 4).unwrap();
    let inflow = [1.0, 2.0, 0.5, 1.5];
    let outflow = [0.8, 1.2, 1.0, 0.6];
    let c_in = [1.0, 3.0, 2.0, 5.0];
    let problem = Problem::new(&inflow, 1.0)
        .with_outflow(&outflow, &selection)
        .with_input_concentration(&c_in)
        .with_old_concentration(0.5);
    let config = Config::new(2, 3).unwrap();

    let full = solve_unobserved(&problem, Mode::Time, &config).unwrap();
    let reduced =
        solve_unobserved(&problem, Mode::Time, &config.with_full_outputs(false)).unwrap();

    assert!(reduced.fields.is_none());
    assert_eq!(reduced.concentration, full.concentration);
}

#[test]
fn emits_one_event_per_timestep() {
    let selection = Uniform::constant(0.0, 10.0, 3).unwrap();
    let c_in = [2.0; 3];
    let problem = Problem::new(&[1.0; 3], 1.0)
        .with_outflow(&[0.5; 3], &selection)
        .with_input_concentration(&c_in)
        .with_old_concentration(2.0);

    let mut steps = Vec::new();
    let observer = |event: &Event<'_>| {
        if let Event::StepCompleted {
            timestep,
            timesteps,
            storage,
            concentration,
        } = event
        {
            assert_eq!(*timesteps, 3);
            // Sub-age grid of 3 ages at 2 substeps each.
            assert_eq!(storage.len(), 7);
            steps.push((*timestep, *concentration));
        }
    };

    solve(&problem, Mode::Time, &Config::new(2, 3).unwrap(), observer).unwrap();

    assert_eq!(steps.len(), 3);
    for (expected, (timestep, concentration)) in steps.into_iter().enumerate() {
        assert_eq!(timestep, expected);
        assert_relative_eq!(concentration.unwrap(), 2.0, epsilon = 1e-12);
    }
}
