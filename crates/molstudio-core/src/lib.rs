//! Domain layer for molstudio.
//!
//! Types, invariants and capability traits for prompt-driven molecule
//! generation sessions. Nothing in this crate performs I/O; the backend, the
//! 2-D editor and the 3-D renderer are reached through traits.

pub mod config;
pub mod editor;
pub mod error;
pub mod experiment;
pub mod gateway;
pub mod knowledge;
pub mod molecule;
pub mod record_store;
pub mod render;
pub mod session;
pub mod simulation;

// Re-export common types
pub use error::{Result, StudioError};
pub use gateway::{Operation, RequestGateway, Structure3d};
pub use molecule::{GenerationRecord, ResultKey, SingleModelResult};
pub use record_store::RecordStore;
