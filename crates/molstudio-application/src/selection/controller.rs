use crate::state::SharedState;
use molstudio_core::molecule::ResultKey;
use molstudio_core::session::ViewTarget;
use molstudio_core::{GenerationRecord, Result};

/// Tracks which result drives the viewport.
///
/// Every user-initiated selection counts as navigation, so a generation that
/// was started earlier will not move the selection when it completes.
#[derive(Clone)]
pub struct SelectionController {
    state: SharedState,
}

impl SelectionController {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Selects a result as the active one.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving the selection unchanged, when the
    /// key does not reference a stored result.
    pub async fn select(&self, record_id: &str, model_name: &str) -> Result<()> {
        let key = ResultKey::new(record_id, model_name);
        let mut state = self.state.write().await;
        state.select(key)?;
        state.session.mark_navigation();
        tracing::debug!(record_id, model = model_name, "[SelectionController] Selected");
        Ok(())
    }

    /// Selects a result as the overlay.
    ///
    /// Returns `false` when rejected because the key is the active result.
    pub async fn select_overlay(&self, record_id: &str, model_name: &str) -> Result<bool> {
        let key = ResultKey::new(record_id, model_name);
        let mut state = self.state.write().await;
        let applied = state.select_overlay(key)?;
        if applied {
            state.session.mark_navigation();
        } else {
            tracing::debug!(
                record_id,
                model = model_name,
                "[SelectionController] Overlay rejected: already active"
            );
        }
        Ok(applied)
    }

    pub async fn clear_overlay(&self) -> bool {
        self.state.write().await.session.selection.clear_overlay()
    }

    /// Activates the record's first result.
    pub async fn from_record(&self, record: &GenerationRecord) -> Result<()> {
        let mut state = self.state.write().await;
        state.select_record(&record.id)?;
        state.session.mark_navigation();
        Ok(())
    }

    pub async fn clear_selection(&self) {
        let mut state = self.state.write().await;
        state.session.selection.clear();
        state.session.mark_navigation();
    }

    /// Primary and overlay structures for the viewport.
    pub async fn view(&self) -> ViewTarget {
        self.state.read().await.view()
    }
}
