//! Molecule generation domain module.
//!
//! - `model`: generation records and per-model results
//! - `catalog`: known generative models and legacy aliases

mod catalog;
mod model;

pub use catalog::{ModelCatalog, ModelInfo, normalize_model_ids};
pub use model::{GenerationRecord, ResultKey, SingleModelResult};
