//! Shared session state.
//!
//! The session and the record store are mutated together (a generation
//! inserts a record and moves the selection), so both live behind one lock.
//! Components hold a [`SharedState`] and never keep the guard across a
//! network await, which makes every mutation atomic relative to the others.

use molstudio_core::molecule::ResultKey;
use molstudio_core::session::{Session, SessionMode, ViewTarget};
use molstudio_core::{RecordStore, Result, StudioError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session plus the records it selects from.
#[derive(Debug, Clone, Default)]
pub struct StudioState {
    pub session: Session,
    pub records: RecordStore,
}

pub type SharedState = Arc<RwLock<StudioState>>;

impl StudioState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            records: RecordStore::new(),
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Makes `key` the active result after checking it resolves.
    pub fn select(&mut self, key: ResultKey) -> Result<()> {
        self.ensure_resolves(&key)?;
        self.session.selection.set_active(key);
        Ok(())
    }

    /// Sets the overlay after checking it resolves.
    ///
    /// Returns `false` when rejected because `key` is the active result.
    pub fn select_overlay(&mut self, key: ResultKey) -> Result<bool> {
        self.ensure_resolves(&key)?;
        Ok(self.session.selection.set_overlay(key))
    }

    /// Activates a stored record and its first result.
    ///
    /// A record without results becomes active with no result selected.
    pub fn select_record(&mut self, record_id: &str) -> Result<()> {
        let record = self
            .records
            .get(record_id)
            .ok_or_else(|| StudioError::not_found("GenerationRecord", record_id))?;
        match record.first_key() {
            Some(key) => self.session.selection.set_active(key),
            None => self.session.selection.set_active_record_only(record_id),
        }
        Ok(())
    }

    /// SMILES of the active result, if the selection resolves.
    pub fn active_smiles(&self) -> Option<&str> {
        self.session
            .selection
            .active_result_key()
            .and_then(|key| self.records.find_result(key))
            .map(|result| result.smiles.as_str())
    }

    fn overlay_smiles(&self) -> Option<&str> {
        self.session
            .selection
            .overlay_result_key()
            .and_then(|key| self.records.find_result(key))
            .map(|result| result.smiles.as_str())
    }

    /// The structures the viewport should show.
    ///
    /// In `Edit` mode the 2-D editor drives the primary structure.
    pub fn view(&self) -> ViewTarget {
        let primary = match self.session.mode {
            SessionMode::Generate => self.active_smiles().map(str::to_string),
            SessionMode::Edit => self
                .session
                .editor_smiles
                .clone()
                .filter(|s| !s.trim().is_empty()),
        };
        ViewTarget::new(primary, self.overlay_smiles().map(str::to_string))
    }

    fn ensure_resolves(&self, key: &ResultKey) -> Result<()> {
        if self.records.find_result(key).is_none() {
            return Err(StudioError::validation(format!(
                "no result '{}' in the record store",
                key
            )));
        }
        Ok(())
    }
}
