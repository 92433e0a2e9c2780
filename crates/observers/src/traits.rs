//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver event types, so an observer written once
//! can follow either traversal order.
//!
//! - [`HasProgress`]: events that mark a unit of completed work
//! - [`HasConcentration`]: events that carry an outflow concentration
//!
//! # Example
//!
//! ```rust
//! use rsas_core::Observer;
//! use rsas_observers::traits::HasProgress;
//!
//! #[derive(Default)]
//! struct Percent(Vec<u32>);
//!
//! impl<E: HasProgress> Observer<E> for Percent {
//!     fn observe(&mut self, event: &E) {
//!         if let Some((done, total)) = event.progress() {
//!             self.0.push(u32::try_from(100 * done / total).unwrap_or(100));
//!         }
//!     }
//! }
//! ```

use rsas_solvers::Event;

/// An event that marks progress through a solve.
pub trait HasProgress {
    /// Returns `(completed, total)` units of work, or `None` when the event
    /// does not complete a unit.
    fn progress(&self) -> Option<(usize, usize)>;
}

/// An event that carries an outflow concentration.
pub trait HasConcentration {
    /// Returns the outflow concentration reported by this event, if any.
    fn concentration(&self) -> Option<f64>;
}

impl HasProgress for Event<'_> {
    fn progress(&self) -> Option<(usize, usize)> {
        match *self {
            Event::AgeCompleted { age, max_age, .. } => Some((age, max_age)),
            Event::StepCompleted {
                timestep,
                timesteps,
                ..
            } => Some((timestep + 1, timesteps)),
            Event::Started { .. } | Event::Finished { .. } => None,
        }
    }
}

impl HasConcentration for Event<'_> {
    fn concentration(&self) -> Option<f64> {
        match *self {
            Event::StepCompleted { concentration, .. } => concentration,
            _ => None,
        }
    }
}
