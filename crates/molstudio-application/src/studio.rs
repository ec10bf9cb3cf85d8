//! `StudioSession`: one generation session wired end to end.
//!
//! UI event → orchestrator → record store → selection → viewport. Each
//! method that can change what is selected re-derives the view target and
//! hands it to the viewport, which debounces it.

use crate::editor::EditorBridge;
use crate::history::{HistorySynchronizer, RefreshOutcome};
use crate::orchestrator::GenerationOrchestrator;
use crate::selection::SelectionController;
use crate::state::{SharedState, StudioState};
use crate::viewport::{ViewportEvent, ViewportSync};
use molstudio_core::config::RootConfig;
use molstudio_core::editor::StructureEditor;
use molstudio_core::render::StructureRenderer;
use molstudio_core::session::{Session, SessionMode, ViewTarget};
use molstudio_core::{GenerationRecord, RequestGateway, Result, StudioError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct StudioSession {
    state: SharedState,
    orchestrator: GenerationOrchestrator,
    selection: SelectionController,
    history: HistorySynchronizer,
    viewport: ViewportSync,
    editor: Option<EditorBridge>,
    config: RootConfig,
    shutdown: CancellationToken,
}

impl StudioSession {
    pub fn new(
        config: RootConfig,
        gateway: Arc<dyn RequestGateway>,
        renderer: Box<dyn StructureRenderer>,
    ) -> (Self, mpsc::UnboundedReceiver<ViewportEvent>) {
        let session = Session::new(config.models.default.iter().cloned());
        tracing::debug!("[StudioSession] New session {}", session.id);
        let state = StudioState::new(session).into_shared();

        let history = HistorySynchronizer::new(gateway.clone(), state.clone());
        let orchestrator =
            GenerationOrchestrator::new(gateway.clone(), state.clone(), history.clone());
        let selection = SelectionController::new(state.clone());
        let (viewport, events) = ViewportSync::new(gateway, renderer, config.debounce_window());

        let studio = Self {
            state,
            orchestrator,
            selection,
            history,
            viewport,
            editor: None,
            config,
            shutdown: CancellationToken::new(),
        };
        (studio, events)
    }

    /// Attaches the 2-D editor used in `Edit` mode.
    pub fn with_editor(mut self, editor: Box<dyn StructureEditor>) -> Self {
        self.editor = Some(EditorBridge::new(editor, self.state.clone()));
        self
    }

    /// Loads history and starts the background refresh when configured.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an invalid configuration before any request.
    pub async fn start(&self) -> Result<RefreshOutcome> {
        self.config.validate()?;
        let outcome = self.history.refresh().await?;
        if let Some(interval) = self.config.refresh_interval() {
            self.history
                .spawn_periodic(interval, self.shutdown.child_token())?;
        }
        Ok(outcome)
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn history(&self) -> &HistorySynchronizer {
        &self.history
    }

    pub fn viewport(&self) -> &ViewportSync {
        &self.viewport
    }

    pub async fn set_prompt(&self, prompt: &str) {
        self.state.write().await.session.prompt = prompt.to_string();
    }

    pub async fn toggle_model(&self, model_id: &str) -> bool {
        self.state.write().await.session.toggle_model(model_id)
    }

    pub async fn set_mode(&self, mode: SessionMode) -> ViewTarget {
        self.state.write().await.session.mode = mode;
        self.sync_viewport().await
    }

    /// Enters `Edit` mode with the active result loaded into the editor.
    pub async fn load_editor(&self) -> Result<Option<String>> {
        let smiles = self.editor()?.load_active().await;
        self.sync_viewport().await;
        Ok(smiles)
    }

    /// Change notification from the editor; the viewport follows in `Edit` mode.
    pub async fn editor_changed(&self, smiles: &str) -> Result<bool> {
        let changed = self.editor()?.handle_change(smiles).await;
        self.after_edit(changed).await
    }

    pub async fn editor_undo(&self) -> Result<bool> {
        let changed = self.editor()?.undo().await;
        self.after_edit(changed).await
    }

    pub async fn editor_redo(&self) -> Result<bool> {
        let changed = self.editor()?.redo().await;
        self.after_edit(changed).await
    }

    pub async fn editor_reset(&self) -> Result<bool> {
        let changed = self.editor()?.reset().await;
        self.after_edit(changed).await
    }

    pub async fn editor_clear(&self) -> Result<bool> {
        let changed = self.editor()?.clear().await;
        self.after_edit(changed).await
    }

    fn editor(&self) -> Result<&EditorBridge> {
        self.editor
            .as_ref()
            .ok_or_else(|| StudioError::validation("no structure editor attached"))
    }

    async fn after_edit(&self, changed: bool) -> Result<bool> {
        if changed {
            self.sync_viewport().await;
        }
        Ok(changed)
    }

    /// Generates from the session's prompt and selected models.
    pub async fn generate(&self) -> Result<GenerationRecord> {
        let (prompt, models) = {
            let state = self.state.read().await;
            let models: Vec<String> = state.session.selected_model_ids.iter().cloned().collect();
            (state.session.prompt.clone(), models)
        };
        let record = self.orchestrator.generate(&prompt, &models).await?;
        self.sync_viewport().await;
        Ok(record)
    }

    pub async fn regenerate(&self, record_id: &str, models: &[String]) -> Result<GenerationRecord> {
        let record = self.orchestrator.regenerate(record_id, models).await?;
        self.sync_viewport().await;
        Ok(record)
    }

    pub async fn select(&self, record_id: &str, model_name: &str) -> Result<()> {
        self.selection.select(record_id, model_name).await?;
        self.sync_viewport().await;
        Ok(())
    }

    pub async fn select_overlay(&self, record_id: &str, model_name: &str) -> Result<bool> {
        let applied = self.selection.select_overlay(record_id, model_name).await?;
        self.sync_viewport().await;
        Ok(applied)
    }

    pub async fn clear_overlay(&self) -> bool {
        let cleared = self.selection.clear_overlay().await;
        self.sync_viewport().await;
        cleared
    }

    /// Activates a history entry by id (a history click).
    pub async fn open_record(&self, record_id: &str) -> Result<()> {
        let record = self
            .state
            .read()
            .await
            .records
            .get(record_id)
            .cloned()
            .ok_or_else(|| StudioError::not_found("GenerationRecord", record_id))?;
        self.selection.from_record(&record).await?;
        self.sync_viewport().await;
        Ok(())
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let outcome = self.history.refresh().await?;
        self.sync_viewport().await;
        Ok(outcome)
    }

    /// Hands the current view target to the viewport.
    pub async fn sync_viewport(&self) -> ViewTarget {
        let target = self.selection.view().await;
        self.viewport.observe(target.clone()).await;
        target
    }

    /// Stops the background refresh and the viewport.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.viewport.shutdown().await;
    }
}
