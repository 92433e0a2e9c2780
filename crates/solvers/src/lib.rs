//! Rank StorAge Selection (rSAS) transport solvers.
//!
//! Given inflow `J`, one or two outflows `Q_k` each drawn by a
//! [`SelectionFunction`], and an initial age-ranked storage profile, the
//! solvers compute on an `(age, time)` grid:
//!
//! - `ST[a, t]`: storage of age `<= a` at time `t`
//! - `PQ_k[a, t]`: cumulative transit-time distribution of outflow `k`
//! - `Qout_k[a, t]`: cumulative outflow drawn from water of age `<= a`
//! - `theta_k`, `thetaS` and the per-bin mass balance
//!
//! and, when an input concentration is given, the outflow concentration.
//!
//! # Algorithm
//!
//! Storage, probability and outflow are coupled implicitly, so every grid
//! cell runs a fixed number of fixed-point iterations: the outflow from a bin
//! is the trapezoidal average of its probability increment over the substep,
//! storage is what remains (floored at zero), and the probability is
//! re-evaluated from the new storage. Each timestep may be split into
//! substeps for accuracy.
//!
//! Two traversal orders are provided through [`Mode`]. [`Mode::Age`] sweeps
//! age rows, each a vector over time; [`Mode::Time`] sweeps time, each step a
//! vector over age, and can skip the full fields when only the outflow
//! concentration is needed. Both converge to the same solution as the
//! iteration count grows.
//!
//! # Example
//!
//! ```
//! use rsas_functions::Uniform;
//! use rsas_solvers::{Config, Key, Mode, Problem, solve_unobserved};
//!
//! let inflow = [1.0; 4];
//! let outflow = [1.0; 4];
//! let selection = Uniform::constant(0.0, 10.0, 4).unwrap();
//!
//! let problem = Problem::new(&inflow, 1.0).with_outflow(&outflow, &selection);
//! let solution = solve_unobserved(&problem, Mode::Time, &Config::default()).unwrap();
//!
//! let storage = solution.get(Key::Storage).unwrap();
//! assert_eq!(storage.dim(), (5, 5));
//! ```
//!
//! [`SelectionFunction`]: rsas_core::SelectionFunction

mod age_major;
mod config;
mod error;
mod event;
mod fields;
mod grid;
mod problem;
mod solution;
mod solve;
mod time_major;

pub mod transport;

pub use config::{Config, ConfigError, Mode};
pub use error::Error;
pub use event::Event;
pub use fields::{Fields, FluxFields};
pub use problem::{Flux, Problem};
pub use solution::{Concentration, Key, Solution};
pub use solve::{solve, solve_unobserved};
pub use transport::{transport, transport_with_evapoconcentration};
