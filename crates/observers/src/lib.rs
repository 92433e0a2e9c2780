//! Reusable observers for rSAS transport solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with the events of both traversal orders.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for cross-solver observers
//!   ([`HasProgress`], [`HasConcentration`])
//!
//! [`LogObserver`] reports solve progress through the [`log`] facade; install
//! any `log` backend to see it.
//!
//! [`Observer`]: rsas_core::Observer
//! [`HasProgress`]: traits::HasProgress
//! [`HasConcentration`]: traits::HasConcentration

pub mod traits;

mod log_observer;

pub use log_observer::LogObserver;
