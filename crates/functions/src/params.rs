use std::array;

use ndarray::ArrayView2;

use crate::{Error, Family};

/// Splits an `n × K` parameter array into its `K` columns.
///
/// Non-finite values are allowed here; each family decides which of its
/// parameters may be infinite.
pub(crate) fn columns<const K: usize>(
    family: Family,
    params: ArrayView2<'_, f64>,
) -> Result<[Vec<f64>; K], Error> {
    if params.ncols() != K {
        return Err(Error::ColumnCount {
            family,
            expected: K,
            actual: params.ncols(),
        });
    }
    if params.nrows() == 0 {
        return Err(Error::Empty { family });
    }

    Ok(array::from_fn(|k| params.column(k).to_vec()))
}

/// Returns the parameter row used at `timestep`.
///
/// Timesteps past the end of a series reuse its last row.
pub(crate) fn row(rows: usize, timestep: usize) -> usize {
    timestep.min(rows.saturating_sub(1))
}

/// Checks that every column has the same, nonzero, number of rows.
pub(crate) fn check_lengths(family: Family, columns: &[&[f64]]) -> Result<usize, Error> {
    let rows = columns.first().map_or(0, |column| column.len());
    if rows == 0 {
        return Err(Error::Empty { family });
    }
    if columns.iter().any(|column| column.len() != rows) {
        return Err(Error::RaggedColumns { family });
    }
    Ok(rows)
}
