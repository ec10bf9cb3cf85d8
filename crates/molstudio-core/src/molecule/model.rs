//! Generation record domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One model's answer to a generation prompt. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleModelResult {
    /// Model identifier as requested (e.g. `your_model`)
    pub model_name: String,
    /// Generated structure
    pub smiles: String,
    /// Model confidence in `[0, 1]`
    pub confidence: f64,
    /// Wall-clock inference time in milliseconds
    pub execution_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Whether the backend could parse the SMILES, when it checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
}

/// A single generation event: one prompt, one or more per-model results.
///
/// `results` keeps the order in which the models responded. Records are
/// changed only by a description edit (in place) or replaced by a
/// regeneration (which produces a new record with a new id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: String,
    pub prompt: String,
    pub results: Vec<SingleModelResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GenerationRecord {
    /// Returns the first result, which drives the default selection.
    pub fn first_result(&self) -> Option<&SingleModelResult> {
        self.results.first()
    }

    /// Finds the result produced by `model_name`.
    pub fn result(&self, model_name: &str) -> Option<&SingleModelResult> {
        self.results.iter().find(|r| r.model_name == model_name)
    }

    /// Key of the first result, if the record has any.
    pub fn first_key(&self) -> Option<ResultKey> {
        self.first_result()
            .map(|r| ResultKey::new(self.id.clone(), r.model_name.clone()))
    }

    /// Model names in response order.
    pub fn model_names(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.model_name.as_str()).collect()
    }
}

/// Addresses one result: `(record id, model name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultKey {
    pub record_id: String,
    pub model_name: String,
}

impl ResultKey {
    pub fn new(record_id: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            model_name: model_name.into(),
        }
    }
}

impl std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.record_id, self.model_name)
    }
}
