use std::{fmt, str::FromStr};

use ndarray::ArrayView2;
use rsas_core::SelectionFunction;

use crate::{Error, Gamma, InverseGaussian, Kumaraswamy, LookupTable, Uniform};

/// The available selection function families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Family {
    Uniform,
    Kumaraswamy,
    Gamma,
    #[cfg_attr(feature = "serde", serde(rename = "invgauss"))]
    InverseGaussian,
    LookupTable,
}

impl Family {
    /// Returns the family name used for parsing and display.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Kumaraswamy => "kumaraswamy",
            Self::Gamma => "gamma",
            Self::InverseGaussian => "invgauss",
            Self::LookupTable => "lookuptable",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            // The misspelling is accepted for parameter files written against
            // older releases.
            "kumaraswamy" | "kumaraswami" => Ok(Self::Kumaraswamy),
            "gamma" => Ok(Self::Gamma),
            "invgauss" => Ok(Self::InverseGaussian),
            "lookuptable" => Ok(Self::LookupTable),
            other => Err(Error::UnknownFamily(other.to_owned())),
        }
    }
}

/// Builds a selection function of the given family from a parameter array.
///
/// Each row of `params` holds the parameters of one timestep (for
/// [`Family::LookupTable`], each row is one `(S_T, Omega)` point of a
/// time-invariant table). See the [crate docs](crate) for the column layout.
///
/// # Errors
///
/// Returns an error if the column count is wrong or a parameter is invalid
/// for the family.
pub fn create(
    family: Family,
    params: ArrayView2<'_, f64>,
) -> Result<Box<dyn SelectionFunction>, Error> {
    let function: Box<dyn SelectionFunction> = match family {
        Family::Uniform => Box::new(Uniform::from_params(params)?),
        Family::Kumaraswamy => Box::new(Kumaraswamy::from_params(params)?),
        Family::Gamma => Box::new(Gamma::from_params(params)?),
        Family::InverseGaussian => Box::new(InverseGaussian::from_params(params)?),
        Family::LookupTable => Box::new(LookupTable::from_params(params)?),
    };
    Ok(function)
}
