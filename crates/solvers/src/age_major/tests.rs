use approx::assert_relative_eq;
use rsas_functions::Uniform;

use crate::{Config, Event, Key, Mode, Problem, solve, solve_unobserved};

#[test]
fn single_cell_matches_hand_calculation() {
    let selection = Uniform::constant(0.0, 10.0, 1).unwrap();
    let problem = Problem::new(&[1.0], 1.0).with_outflow(&[1.0], &selection);

    let solution = solve_unobserved(&problem, Mode::Age, &Config::default()).unwrap();

    // Three iterations of dST = 1 - (0 + dST / 10) / 2 starting from dST = 1.
    let storage = solution.get(Key::Storage).unwrap();
    let outflow = solution.get(Key::Outflow(1)).unwrap();
    let transit = solution.get(Key::Transit(1)).unwrap();
    assert_relative_eq!(storage[[1, 1]], 0.952_375, epsilon = 1e-12);
    assert_relative_eq!(outflow[[1, 1]], 0.047_625, epsilon = 1e-12);
    assert_relative_eq!(transit[[1, 1]], 0.095_237_5, epsilon = 1e-12);
    assert_relative_eq!(solution.get(Key::MassBalance).unwrap()[[1, 1]], 0.0, epsilon = 1e-12);
}

#[test]
fn steady_inflow_reaches_steady_profile() {
    let selection = Uniform::constant(0.0, 1.0, 4).unwrap();
    let problem = Problem::new(&[1.0; 4], 1.0).with_outflow(&[1.0; 4], &selection);

    let solution = solve_unobserved(&problem, Mode::Age, &Config::default()).unwrap();
    let storage = solution.get(Key::Storage).unwrap();

    let expected = [0.0, 0.625, 0.8125, 0.859_375, 0.871_093_75];
    for (age, &value) in expected.iter().enumerate() {
        assert_relative_eq!(storage[[age, 4]], value, epsilon = 1e-12);
    }
    // Once an age is reached its storage no longer changes.
    for age in 1..=4 {
        for time in age..=4 {
            assert_relative_eq!(storage[[age, time]], expected[age], epsilon = 1e-12);
        }
    }
}

#[test]
fn zero_age_row_is_empty() {
    let selection = Uniform::constant(0.0, 5.0, 3).unwrap();
    let initial = [0.0, 1.0, 2.0, 2.5];
    let problem = Problem::new(&[1.0, 0.5, 2.0], 1.0)
        .with_outflow(&[0.5, 0.5, 0.5], &selection)
        .with_initial_storage(&initial);

    let solution = solve_unobserved(&problem, Mode::Age, &Config::new(2, 3).unwrap()).unwrap();

    let storage = solution.get(Key::Storage).unwrap();
    let outflow = solution.get(Key::Outflow(1)).unwrap();
    for time in 0..=3 {
        assert_relative_eq!(storage[[0, time]], 0.0);
        assert_relative_eq!(outflow[[0, time]], 0.0);
    }
    for (age, &value) in initial.iter().enumerate() {
        assert_relative_eq!(storage[[age, 0]], value, epsilon = 1e-12);
    }
}

#[test]
fn initial_storage_drains_without_inflow() {
    let selection = Uniform::constant(0.0, 4.0, 3).unwrap();
    let initial = [0.0, 1.0, 2.0, 3.0];
    let problem = Problem::new(&[0.0; 3], 1.0)
        .with_outflow(&[1.0; 3], &selection)
        .with_initial_storage(&initial);

    let solution = solve_unobserved(&problem, Mode::Age, &Config::default()).unwrap();
    let fields = solution.fields.unwrap();

    let total = fields.storage.row(3).to_vec();
    assert!(total.windows(2).all(|w| w[1] <= w[0]));
    assert_relative_eq!(total[3], 0.0, epsilon = 1e-12);
    assert!(fields.storage.iter().all(|&st| st >= 0.0));
    // Nothing entered, so no cohort has a partition.
    assert!(fields.theta_storage.iter().all(|&theta| theta == 0.0));
    for &balance in &fields.mass_balance {
        assert_relative_eq!(balance, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn emits_one_event_per_age() {
    let selection = Uniform::constant(0.0, 10.0, 2).unwrap();
    let initial = [0.0, 1.0, 2.0];
    let problem = Problem::new(&[1.0, 1.0], 1.0)
        .with_outflow(&[0.5, 0.5], &selection)
        .with_initial_storage(&initial);

    let mut ages = Vec::new();
    let mut started = 0;
    let mut finished = 0;
    let observer = |event: &Event<'_>| match event {
        Event::Started { mode, max_age, .. } => {
            assert_eq!(*mode, Mode::Age);
            assert_eq!(*max_age, 2);
            started += 1;
        }
        Event::AgeCompleted { age, storage, .. } => {
            assert_eq!(storage.len(), 3);
            ages.push(*age);
        }
        Event::StepCompleted { .. } => panic!("age-major emits no step events"),
        Event::Finished { .. } => finished += 1,
    };

    solve(&problem, Mode::Age, &Config::new(3, 3).unwrap(), observer).unwrap();

    assert_eq!(ages, vec![1, 2]);
    assert_eq!((started, finished), (1, 1));
}
