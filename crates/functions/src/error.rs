use ninterp::error::ValidateError;
use thiserror::Error;

use crate::Family;

/// Errors that can occur when building a selection function.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no such selection function family: `{0}`")]
    UnknownFamily(String),

    #[error("{family} expects {expected} parameter columns, got {actual}")]
    ColumnCount {
        family: Family,
        expected: usize,
        actual: usize,
    },

    #[error("{family} parameters are empty")]
    Empty { family: Family },

    #[error("{family} parameter columns have different lengths")]
    RaggedColumns { family: Family },

    #[error("{family} parameter row {row}: {reason}")]
    InvalidParameter {
        family: Family,
        row: usize,
        reason: &'static str,
    },

    #[error("lookup table probabilities must start at 0 and end at 1")]
    LookupBounds,

    #[error("invalid lookup table")]
    Lookup(#[from] ValidateError),
}
