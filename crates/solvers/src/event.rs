use ndarray::ArrayView1;

use crate::Mode;

/// Progress events emitted by [`solve`](crate::solve).
///
/// The age-major solver emits one [`Event::AgeCompleted`] per output age and
/// the time-major solver one [`Event::StepCompleted`] per timestep, between a
/// single [`Event::Started`] and [`Event::Finished`].
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// Validation passed and buffers are allocated.
    Started {
        mode: Mode,
        max_age: usize,
        timesteps: usize,
        substeps: usize,
        fluxes: usize,
    },

    /// Age row `age` is final.
    AgeCompleted {
        age: usize,
        max_age: usize,

        /// Storage of age `<= age` at every time.
        storage: ArrayView1<'a, f64>,
    },

    /// Timestep `timestep` (0-based) is final.
    StepCompleted {
        timestep: usize,
        timesteps: usize,

        /// Age-ranked storage at the end of the timestep, on the sub-age grid.
        storage: ArrayView1<'a, f64>,

        /// Outflow concentration during the timestep, if computed.
        concentration: Option<f64>,
    },

    /// The solve is complete.
    Finished { mode: Mode },
}
