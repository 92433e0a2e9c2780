use std::{fmt, str::FromStr};

use thiserror::Error;

/// Configuration shared by both traversal orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    substeps: usize,
    iterations: usize,
    full_outputs: bool,
    evapoconcentration: bool,
}

/// Errors that can occur when validating a solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("substeps must be at least 1")]
    Substeps,

    #[error("iterations must be at least 1")]
    Iterations,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            substeps: 1,
            iterations: 3,
            full_outputs: true,
            evapoconcentration: false,
        }
    }
}

impl Config {
    /// Creates a new config with full outputs and no evapoconcentration.
    ///
    /// Each timestep is split into `substeps` substeps, and every grid cell
    /// runs exactly `iterations` fixed-point iterations.
    ///
    /// # Errors
    ///
    /// Returns an error if `substeps` or `iterations` is zero.
    pub fn new(substeps: usize, iterations: usize) -> Result<Self, ConfigError> {
        if substeps == 0 {
            return Err(ConfigError::Substeps);
        }
        if iterations == 0 {
            return Err(ConfigError::Iterations);
        }

        Ok(Self {
            substeps,
            iterations,
            ..Self::default()
        })
    }

    /// Sets whether the full `(age, time)` fields are returned.
    ///
    /// Turning this off is only supported by the time-major solver when an
    /// input concentration is given, in which case only the output
    /// concentration is computed.
    #[must_use]
    pub fn with_full_outputs(mut self, full_outputs: bool) -> Self {
        self.full_outputs = full_outputs;
        self
    }

    /// Sets whether the second outflow removes water but no solute.
    #[must_use]
    pub fn with_evapoconcentration(mut self, evapoconcentration: bool) -> Self {
        self.evapoconcentration = evapoconcentration;
        self
    }

    /// Returns the number of substeps per timestep.
    #[must_use]
    pub fn substeps(&self) -> usize {
        self.substeps
    }

    /// Returns the number of fixed-point iterations per cell.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns whether the full fields are returned.
    #[must_use]
    pub fn full_outputs(&self) -> bool {
        self.full_outputs
    }

    /// Returns whether evapoconcentration is enabled.
    #[must_use]
    pub fn evapoconcentration(&self) -> bool {
        self.evapoconcentration
    }
}

/// Traversal order of the `(age, time)` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Age is the outer loop; each age row is a vector over time.
    Age,

    /// Time is the outer loop; each time column is a vector over age.
    Time,
}

impl Mode {
    /// Returns the name accepted by [`Mode::from_str`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "age" => Ok(Self::Age),
            "time" => Ok(Self::Time),
            other => Err(crate::Error::NotImplemented(format!("mode `{other}`"))),
        }
    }
}
