//! Session domain module.
//!
//! A session is ephemeral UI state, one per mount: the prompt being edited,
//! the models picked for the next generation, and what is currently selected.
//! It is never persisted.
//!
//! - `model`: `Session`, `SessionMode`
//! - `selection`: active/overlay pointers with the overlay ≠ active invariant
//! - `view`: `ViewTarget`, the structures the 3-D viewport should show

mod model;
mod selection;
mod view;

pub use model::{Session, SessionMode};
pub use selection::Selection;
pub use view::ViewTarget;
