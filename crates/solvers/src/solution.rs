use std::{fmt, str::FromStr};

use ndarray::ArrayView2;

use crate::{Error, Fields};

/// The result of an rSAS solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Full `(age, time)` fields, absent in reduced-memory runs.
    pub fields: Option<Fields>,

    /// Outflow concentration of flux 1, present when an input concentration
    /// was given.
    pub concentration: Option<Concentration>,
}

/// Outflow concentration series, one value per timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct Concentration {
    /// `C_out`: modeled concentration plus the old-water correction.
    pub output: Vec<f64>,

    /// Convolution of the input concentration with the transit-time
    /// distribution, before the old-water correction.
    pub modeled: Vec<f64>,

    /// Fraction of the outflow whose age is resolved by the solve.
    pub observed_fraction: Vec<f64>,
}

impl Solution {
    /// Returns the field labelled by `key`, if present.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<ArrayView2<'_, f64>> {
        let fields = self.fields.as_ref()?;
        let flux = move |k: usize| k.checked_sub(1).and_then(|i| fields.fluxes.get(i));

        match key {
            Key::Storage => Some(fields.storage.view()),
            Key::Transit(k) => flux(k).map(|f| f.transit.view()),
            Key::Outflow(k) => flux(k).map(|f| f.outflow.view()),
            Key::Theta(k) => flux(k).map(|f| f.theta.view()),
            Key::ThetaStorage => Some(fields.theta_storage.view()),
            Key::MassBalance => Some(fields.mass_balance.view()),
        }
    }

    /// Returns the labels of every field present, storage first.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        let Some(fields) = &self.fields else {
            return Vec::new();
        };

        let fluxes = 1..=fields.fluxes.len();
        std::iter::once(Key::Storage)
            .chain(fluxes.clone().map(Key::Transit))
            .chain(fluxes.clone().map(Key::Outflow))
            .chain(fluxes.map(Key::Theta))
            .chain([Key::ThetaStorage, Key::MassBalance])
            .collect()
    }

    /// Returns the `C_out` series, if computed.
    #[must_use]
    pub fn output_concentration(&self) -> Option<&[f64]> {
        self.concentration.as_ref().map(|c| c.output.as_slice())
    }
}

/// Label of a solution field.
///
/// Flux numbers start at 1, matching the labels `PQ1`, `Q1out`, `theta1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `ST`
    Storage,
    /// `PQk`
    Transit(usize),
    /// `Qkout`
    Outflow(usize),
    /// `thetak`
    Theta(usize),
    /// `thetaS`
    ThetaStorage,
    /// `MassBalance`
    MassBalance,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage => f.write_str("ST"),
            Self::Transit(k) => write!(f, "PQ{k}"),
            Self::Outflow(k) => write!(f, "Q{k}out"),
            Self::Theta(k) => write!(f, "theta{k}"),
            Self::ThetaStorage => f.write_str("thetaS"),
            Self::MassBalance => f.write_str("MassBalance"),
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let flux = |digits: &str| digits.parse::<usize>().ok().filter(|&k| k > 0);

        let key = match s {
            "ST" => Some(Self::Storage),
            "thetaS" => Some(Self::ThetaStorage),
            "MassBalance" => Some(Self::MassBalance),
            _ => {
                if let Some(k) = s.strip_prefix("PQ") {
                    flux(k).map(Self::Transit)
                } else if let Some(k) = s.strip_prefix('Q').and_then(|r| r.strip_suffix("out")) {
                    flux(k).map(Self::Outflow)
                } else {
                    s.strip_prefix("theta").and_then(flux).map(Self::Theta)
                }
            }
        };

        key.ok_or_else(|| Error::NotImplemented(format!("field `{s}`")))
    }
}
