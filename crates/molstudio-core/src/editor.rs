//! 2-D structure editor capability.
//!
//! The editor widget is opaque. Its change notifications are delivered by the
//! host (see the application layer's `EditorBridge::handle_change`); the core
//! only calls back into it through this trait.

pub trait StructureEditor: Send {
    /// Clears the canvas.
    fn reset(&mut self);
    fn undo(&mut self);
    fn redo(&mut self);
    /// Current structure as SMILES (empty when the canvas is blank).
    fn get_smiles(&self) -> String;
    fn set_smiles(&mut self, smiles: &str);
}
