//! Session domain model.

use super::selection::Selection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::Display;

/// Which panel drives the primary structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionMode {
    /// Prompt-driven generation; the selected result is shown.
    #[default]
    Generate,
    /// 2-D editing; the editor's structure is shown.
    Edit,
}

/// Ephemeral per-mount session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Local identifier for log correlation (UUID format)
    pub id: String,
    pub mode: SessionMode,
    /// Prompt text currently in the input box
    pub prompt: String,
    /// Models the next generation is dispatched to
    pub selected_model_ids: BTreeSet<String>,
    /// Active and overlay result pointers
    pub selection: Selection,
    /// Last SMILES reported by the 2-D editor
    pub editor_smiles: Option<String>,
    /// Incremented on every user navigation (select, history click)
    navigation_epoch: u64,
}

impl Session {
    /// Creates a session preselecting the given models.
    pub fn new<I, S>(default_models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode: SessionMode::default(),
            prompt: String::new(),
            selected_model_ids: default_models.into_iter().map(Into::into).collect(),
            selection: Selection::default(),
            editor_smiles: None,
            navigation_epoch: 0,
        }
    }

    /// Adds the model if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle_model(&mut self, model_id: &str) -> bool {
        if self.selected_model_ids.remove(model_id) {
            false
        } else {
            self.selected_model_ids.insert(model_id.to_string());
            true
        }
    }

    pub fn navigation_epoch(&self) -> u64 {
        self.navigation_epoch
    }

    /// Records a user navigation. Pending generations started before this
    /// point will not steal the selection when they complete.
    pub fn mark_navigation(&mut self) -> u64 {
        self.navigation_epoch += 1;
        self.navigation_epoch
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(["your_model"])
    }
}
