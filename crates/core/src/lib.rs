//! Core traits for rank StorAge Selection (rSAS) transport modeling.
//!
//! This crate defines the shared abstractions that selection-function
//! families, solvers, and observers build on:
//!
//! - [`SelectionFunction`]: maps age-ranked storage to the cumulative
//!   probability that outflow is drawn from it
//! - [`Observer`]: receives solver events for logging or progress reporting

mod observer;
mod selection;

pub use observer::Observer;
pub use selection::SelectionFunction;
