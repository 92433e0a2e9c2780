use thiserror::Error;

/// Errors returned by [`solve`](crate::solve) before any work is done.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("inflow series is empty")]
    EmptyInflow,

    #[error("{series} has length {actual}, expected {expected}")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("{series} contains a non-finite value at index {index}")]
    NonFinite { series: String, index: usize },

    #[error("timestep length must be positive and finite, got {0}")]
    InvalidTimestep(f64),

    #[error("at least one outflow is required")]
    NoOutflows,

    #[error("got {outflows} outflow series but {functions} selection functions")]
    FunctionCount { outflows: usize, functions: usize },

    #[error("initial storage needs at least 2 values, got {0}")]
    InitialStorageTooShort(usize),

    #[error("initial storage decreases with age at index {index}")]
    DecreasingInitialStorage { index: usize },

    #[error("{0} requires an input concentration series")]
    MissingConcentration(&'static str),

    #[error("evapoconcentration requires exactly two outflows, got {0}")]
    EvapoconcentrationOutflows(usize),

    #[error("not implemented: {0}")]
    NotImplemented(String),
}
