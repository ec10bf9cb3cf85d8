//! Known generative models.

use serde::{Deserialize, Serialize};

/// Display metadata for a generative model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Legacy ids accepted by the backend, mapped to their current names.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("model_a", "your_model"),
    ("model_b", "molt5"),
    ("model_c", "chemberta"),
];

/// The set of models a session can dispatch to.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
}

impl ModelCatalog {
    /// Catalog of the models shipped with the backend.
    pub fn builtin() -> Self {
        let entry = |id: &str, name: &str, description: &str| ModelInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        };
        Self {
            models: vec![
                entry("your_model", "Your Model", "Custom trained model"),
                entry("molt5", "MolT5", "Transformer for molecules"),
                entry("chemberta", "ChemBERTa", "BERT-based chemistry model"),
            ],
        }
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn get(&self, id: &str) -> Option<&ModelInfo> {
        let id = normalize_model_id(id);
        self.models.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lower-cases a model id and resolves legacy aliases.
fn normalize_model_id(id: &str) -> String {
    let lower = id.trim().to_lowercase();
    LEGACY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(lower)
}

/// Normalizes and de-duplicates requested model ids, keeping first-seen order.
///
/// Blank ids are dropped; unknown ids pass through unchanged (lower-cased).
pub fn normalize_model_ids<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for id in ids {
        let id = normalize_model_id(id.as_ref());
        if !id.is_empty() && !normalized.contains(&id) {
            normalized.push(id);
        }
    }
    normalized
}
