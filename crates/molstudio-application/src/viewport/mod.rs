//! 3-D viewport synchronization.
//!
//! - `machine`: pure debounce/supersession state machine
//! - `sync`: tokio driver owning the renderer

mod machine;
mod sync;

pub use machine::{
    FetchFailure, FetchOutcome, FetchTicket, ObserveOutcome, RenderPlan, ViewportCompletion,
    ViewportMachine, ViewportPhase,
};
pub use sync::{ViewportEvent, ViewportSync};
