//! Experiment domain module.
//!
//! An experiment groups generation runs so they can be compared side by side.

mod model;

pub use model::{Experiment, ExperimentCreate};
