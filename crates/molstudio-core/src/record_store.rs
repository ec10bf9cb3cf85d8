//! In-memory store of generation records.
//!
//! `RecordStore` is the source of truth for history and for resolving the
//! active selection. Records are kept most-recent-first and ids are unique.

use crate::error::{Result, StudioError};
use crate::molecule::{GenerationRecord, ResultKey, SingleModelResult};
use chrono::{DateTime, Utc};

/// Ordered, id-unique collection of generation records (most recent first).
///
/// Local writes (`insert_front`, `update_prompt`) bump `local_revision`;
/// wholesale replacement from the backend does not, so a synchronizer can
/// tell whether a listing predates a local write.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<GenerationRecord>,
    local_revision: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a backend listing, dropping repeated ids.
    pub fn from_records(records: Vec<GenerationRecord>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, record_id: &str) -> Option<&GenerationRecord> {
        self.records.iter().find(|r| r.id == record_id)
    }

    pub fn contains(&self, record_id: &str) -> bool {
        self.get(record_id).is_some()
    }

    /// The most recent record.
    pub fn head(&self) -> Option<&GenerationRecord> {
        self.records.first()
    }

    /// Resolves a result key against the stored records.
    pub fn find_result(&self, key: &ResultKey) -> Option<&SingleModelResult> {
        self.get(&key.record_id)
            .and_then(|record| record.result(&key.model_name))
    }

    /// Counter of local writes applied since the store was created.
    pub fn local_revision(&self) -> u64 {
        self.local_revision
    }

    /// Inserts a record at the head.
    ///
    /// A stored record with the same id is removed first, so ids stay unique.
    /// Returns `true` when an existing record was replaced.
    pub fn insert_front(&mut self, record: GenerationRecord) -> bool {
        let replaced = match self.records.iter().position(|r| r.id == record.id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        };
        self.records.insert(0, record);
        self.local_revision += 1;
        replaced
    }

    /// Replaces the prompt of a record in place and stamps `updated_at`.
    ///
    /// `results` are left untouched.
    pub fn update_prompt(
        &mut self,
        record_id: &str,
        prompt: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| StudioError::not_found("GenerationRecord", record_id))?;

        record.prompt = prompt.into();
        record.updated_at = Some(updated_at);
        self.local_revision += 1;
        Ok(())
    }

    /// Replaces the whole collection with a confirmed listing.
    ///
    /// The listing's order is kept; a repeated id keeps its first occurrence.
    /// Returns the number of records dropped as duplicates.
    pub fn replace_all(&mut self, records: Vec<GenerationRecord>) -> usize {
        let incoming = records.len();
        let mut unique: Vec<GenerationRecord> = Vec::with_capacity(incoming);
        for record in records {
            if !unique.iter().any(|r| r.id == record.id) {
                unique.push(record);
            }
        }
        let dropped = incoming - unique.len();
        if dropped > 0 {
            tracing::warn!(
                "[RecordStore] Dropped {} record(s) with repeated ids from listing",
                dropped
            );
        }
        self.records = unique;
        dropped
    }
}
