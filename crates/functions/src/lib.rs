//! Storage selection function families.
//!
//! Every family takes one parameter row per timestep (an `n × k` array) and
//! implements [`SelectionFunction`], so solvers can evaluate either a batch of
//! storage values across timesteps (`cdf_all`) or a whole age profile at one
//! timestep (`cdf_i`).
//!
//! | family                            | columns                        |
//! |-----------------------------------|--------------------------------|
//! | [`Uniform`]                       | `ST_min, ST_max`               |
//! | [`Kumaraswamy`]                   | `ST_min, ST_max, a, b`         |
//! | [`Gamma`]                         | `ST_min, ST_max, scale, shape` |
//! | [`InverseGaussian`]               | `loc, scale, mu`               |
//! | [`LookupTable`]                   | `S_T, Omega`                   |
//!
//! A timestep past the end of a parameter series uses the last row.
//!
//! Use [`create`] to build a family by name from a parameter array:
//!
//! ```
//! use ndarray::array;
//! use rsas_core::SelectionFunction;
//! use rsas_functions::{Family, create};
//!
//! let params = array![[0.0, 10.0], [0.0, 20.0]];
//! let function = create("uniform".parse::<Family>().unwrap(), params.view()).unwrap();
//!
//! let mut probability = [0.0; 2];
//! function.cdf_all(&[5.0, 5.0], &mut probability);
//! assert_eq!(probability, [0.5, 0.25]);
//! ```
//!
//! [`SelectionFunction`]: rsas_core::SelectionFunction

/// Implements [`rsas_core::SelectionFunction`] for a family with a scalar
/// `cdf(&self, storage, timestep)` method.
macro_rules! impl_selection_function {
    ($family:ty) => {
        impl rsas_core::SelectionFunction for $family {
            fn cdf_all(&self, storage: &[f64], probability: &mut [f64]) {
                for (timestep, (&st, p)) in storage.iter().zip(probability.iter_mut()).enumerate() {
                    *p = self.cdf(st, timestep);
                }
            }

            fn cdf_i(&self, storage: &[f64], timestep: usize, probability: &mut [f64]) {
                for (&st, p) in storage.iter().zip(probability.iter_mut()) {
                    *p = self.cdf(st, timestep);
                }
            }
        }
    };
}

mod error;
mod family;
mod gamma;
mod inverse_gaussian;
mod kumaraswamy;
mod lookup;
mod params;
mod uniform;

pub use error::Error;
pub use family::{Family, create};
pub use gamma::Gamma;
pub use inverse_gaussian::InverseGaussian;
pub use kumaraswamy::Kumaraswamy;
pub use lookup::LookupTable;
pub use uniform::Uniform;
