//! Application layer for molstudio.
//!
//! Coordinates the domain types in `molstudio-core` with a [`RequestGateway`]
//! implementation: the generation lifecycle, selection, the debounced 3-D
//! viewport, history reconciliation, and the experiment, chat and docking
//! workflows.
//!
//! [`RequestGateway`]: molstudio_core::RequestGateway

pub mod docking;
pub mod editor;
pub mod experiment;
pub mod history;
pub mod knowledge;
pub mod orchestrator;
pub mod selection;
pub mod state;
pub mod studio;
pub mod viewport;

pub use docking::DockingService;
pub use editor::EditorBridge;
pub use experiment::ExperimentWorkbench;
pub use history::{HistorySynchronizer, RefreshOutcome};
pub use knowledge::KnowledgeChat;
pub use orchestrator::GenerationOrchestrator;
pub use selection::{ComparisonSelection, SelectionController};
pub use state::{SharedState, StudioState};
pub use studio::StudioSession;
pub use viewport::{ViewportEvent, ViewportMachine, ViewportSync};
