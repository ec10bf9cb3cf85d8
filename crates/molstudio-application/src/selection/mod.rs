//! Selection services.
//!
//! - `controller`: single selection with an optional overlay (dashboard)
//! - `comparison`: dual selection of experiment runs

mod comparison;
mod controller;

pub use comparison::ComparisonSelection;
pub use controller::SelectionController;
