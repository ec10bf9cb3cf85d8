//! Active/overlay selection pointers.

use crate::molecule::ResultKey;
use serde::{Deserialize, Serialize};

/// Which record and result drive the viewport, plus an optional comparison overlay.
///
/// Invariants kept by every method:
/// - `active_result_key`, when set, names `active_record_id`
/// - `overlay_result_key` never equals `active_result_key`
///
/// Whether a key references a stored result is checked by the caller
/// against the record store before calling in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    active_record_id: Option<String>,
    active_result_key: Option<ResultKey>,
    overlay_result_key: Option<ResultKey>,
}

impl Selection {
    pub fn active_record_id(&self) -> Option<&str> {
        self.active_record_id.as_deref()
    }

    pub fn active_result_key(&self) -> Option<&ResultKey> {
        self.active_result_key.as_ref()
    }

    pub fn overlay_result_key(&self) -> Option<&ResultKey> {
        self.overlay_result_key.as_ref()
    }

    /// Makes `key` the active result (and its record the active record).
    ///
    /// An overlay pointing at the same key is cleared.
    pub fn set_active(&mut self, key: ResultKey) {
        if self.overlay_result_key.as_ref() == Some(&key) {
            self.overlay_result_key = None;
        }
        self.active_record_id = Some(key.record_id.clone());
        self.active_result_key = Some(key);
    }

    /// Activates a record that has no results to point at.
    pub fn set_active_record_only(&mut self, record_id: impl Into<String>) {
        self.active_record_id = Some(record_id.into());
        self.active_result_key = None;
    }

    /// Sets the overlay. Rejected (returns `false`) when `key` is the active result.
    pub fn set_overlay(&mut self, key: ResultKey) -> bool {
        if self.active_result_key.as_ref() == Some(&key) {
            return false;
        }
        self.overlay_result_key = Some(key);
        true
    }

    pub fn clear_overlay(&mut self) -> bool {
        self.overlay_result_key.take().is_some()
    }

    /// Unsets active record, active result and overlay.
    pub fn clear(&mut self) {
        self.active_record_id = None;
        self.active_result_key = None;
        self.overlay_result_key = None;
    }

    pub fn is_empty(&self) -> bool {
        self.active_record_id.is_none() && self.overlay_result_key.is_none()
    }
}
