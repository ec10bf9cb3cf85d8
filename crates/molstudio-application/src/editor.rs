//! Bridge between the 2-D structure editor and the session.

use crate::state::SharedState;
use molstudio_core::editor::StructureEditor;
use molstudio_core::session::SessionMode;
use tokio::sync::Mutex;

/// Keeps `Session::editor_smiles` in step with the editor widget.
pub struct EditorBridge {
    editor: Mutex<Box<dyn StructureEditor>>,
    state: SharedState,
}

impl EditorBridge {
    pub fn new(editor: Box<dyn StructureEditor>, state: SharedState) -> Self {
        Self {
            editor: Mutex::new(editor),
            state,
        }
    }

    /// Switches the session to `Edit` mode and loads the active result.
    ///
    /// Returns the SMILES pushed into the editor, if a result was active.
    pub async fn load_active(&self) -> Option<String> {
        let smiles = {
            let mut state = self.state.write().await;
            state.session.mode = SessionMode::Edit;
            state.active_smiles().map(str::to_string)
        };
        if let Some(smiles) = &smiles {
            self.editor.lock().await.set_smiles(smiles);
            self.handle_change(smiles).await;
        }
        smiles
    }

    /// Records a change notification from the editor.
    ///
    /// Returns `false` when the SMILES is unchanged.
    pub async fn handle_change(&self, smiles: &str) -> bool {
        let smiles = smiles.trim();
        let mut state = self.state.write().await;
        if state.session.editor_smiles.as_deref().unwrap_or_default() == smiles {
            return false;
        }
        tracing::debug!(smiles, "[EditorBridge] Editor changed");
        state.session.editor_smiles = (!smiles.is_empty()).then(|| smiles.to_string());
        true
    }

    pub async fn reset(&self) -> bool {
        self.apply(|editor| editor.reset()).await
    }

    pub async fn undo(&self) -> bool {
        self.apply(|editor| editor.undo()).await
    }

    pub async fn redo(&self) -> bool {
        self.apply(|editor| editor.redo()).await
    }

    /// Empties the canvas.
    pub async fn clear(&self) -> bool {
        self.apply(|editor| editor.set_smiles("")).await
    }

    pub async fn current_smiles(&self) -> String {
        self.editor.lock().await.get_smiles()
    }

    async fn apply(&self, action: impl FnOnce(&mut dyn StructureEditor)) -> bool {
        let smiles = {
            let mut editor = self.editor.lock().await;
            action(editor.as_mut());
            editor.get_smiles()
        };
        self.handle_change(&smiles).await
    }
}
