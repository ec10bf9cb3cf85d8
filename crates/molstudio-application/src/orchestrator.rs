//! Generation request lifecycle.
//!
//! Validates input before any I/O, issues the backend call, then applies the
//! response to the record store and the selection in one critical section.
//! A successful mutation is followed by a history refresh whose failure is
//! logged, never returned.

use crate::history::HistorySynchronizer;
use crate::state::SharedState;
use chrono::Utc;
use molstudio_core::molecule::normalize_model_ids;
use molstudio_core::{GenerationRecord, RequestGateway, Result, StudioError};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct GenerationOrchestrator {
    gateway: Arc<dyn RequestGateway>,
    state: SharedState,
    history: HistorySynchronizer,
}

impl GenerationOrchestrator {
    pub fn new(
        gateway: Arc<dyn RequestGateway>,
        state: SharedState,
        history: HistorySynchronizer,
    ) -> Self {
        Self {
            gateway,
            state,
            history,
        }
    }

    /// Generates a record for `prompt` with one result per responding model.
    ///
    /// The record is inserted at the head of history. It becomes the active
    /// selection unless the user navigated while the request was in flight.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank prompt or an empty model set (no request sent)
    /// - `GenerationFailed` carrying the prompt and models for retry
    pub async fn generate(&self, prompt: &str, models: &[String]) -> Result<GenerationRecord> {
        let (prompt, models) = validate_request(prompt, models)?;
        let epoch = self.navigation_epoch().await;
        tracing::info!(
            prompt = %prompt,
            models = %models.join(","),
            "[GenerationOrchestrator] Generating"
        );

        let record = self
            .gateway
            .generate(&prompt, &models)
            .await
            .map_err(|e| generation_failed(&prompt, &models, e))?;

        self.accept(record, epoch).await
    }

    /// Same as [`generate`](Self::generate), recorded as a run of `experiment_id`.
    pub async fn generate_in_experiment(
        &self,
        experiment_id: &str,
        prompt: &str,
        models: &[String],
    ) -> Result<GenerationRecord> {
        if experiment_id.trim().is_empty() {
            return Err(StudioError::validation("experiment id must not be empty"));
        }
        let (prompt, models) = validate_request(prompt, models)?;
        let epoch = self.navigation_epoch().await;

        let mut record = self
            .gateway
            .generate_in_experiment(experiment_id, &prompt, &models)
            .await
            .map_err(|e| generation_failed(&prompt, &models, e))?;
        if record.experiment_id.is_none() {
            record.experiment_id = Some(experiment_id.to_string());
        }

        self.accept(record, epoch).await
    }

    /// Creates a new record from an existing record's prompt.
    ///
    /// The source record is never modified.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty model set
    /// - `NotFound` when the source record is not in local history
    /// - `RegenerationFailed` when the call fails or the backend answers with
    ///   the id of a record already in history
    pub async fn regenerate(&self, record_id: &str, models: &[String]) -> Result<GenerationRecord> {
        let models = normalize_model_ids(models);
        if models.is_empty() {
            return Err(StudioError::validation("at least one model must be selected"));
        }
        let (epoch, known_ids) = {
            let state = self.state.read().await;
            if !state.records.contains(record_id) {
                return Err(StudioError::not_found("GenerationRecord", record_id));
            }
            let known_ids: HashSet<String> =
                state.records.records().iter().map(|r| r.id.clone()).collect();
            (state.session.navigation_epoch(), known_ids)
        };
        tracing::info!(
            record_id,
            models = %models.join(","),
            "[GenerationOrchestrator] Regenerating"
        );

        let record = self
            .gateway
            .regenerate(record_id, &models)
            .await
            .map_err(|e| StudioError::RegenerationFailed {
                record_id: record_id.to_string(),
                models: models.clone(),
                cause: cause_of(e),
            })?;
        // Never overwrite a record known before the request.
        if known_ids.contains(&record.id) {
            return Err(StudioError::RegenerationFailed {
                record_id: record_id.to_string(),
                models,
                cause: format!("backend returned existing record id '{}'", record.id),
            });
        }

        self.accept(record, epoch).await
    }

    /// Replaces a record's prompt once the backend confirms it.
    pub async fn update_description(&self, record_id: &str, prompt: &str) -> Result<()> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StudioError::validation("description must not be empty"));
        }
        if !self.state.read().await.records.contains(record_id) {
            return Err(StudioError::not_found("GenerationRecord", record_id));
        }

        self.gateway.update_description(record_id, prompt).await?;

        // The record may have vanished through a refresh while the request
        // was in flight; the backend has the edit either way.
        if let Err(e) = self
            .state
            .write()
            .await
            .records
            .update_prompt(record_id, prompt, Utc::now())
        {
            tracing::warn!(
                record_id,
                error = %e,
                "[GenerationOrchestrator] Edit confirmed but not applied locally"
            );
        }
        tracing::debug!(record_id, "[GenerationOrchestrator] Description updated");

        self.refresh_after_mutation().await;
        Ok(())
    }

    async fn navigation_epoch(&self) -> u64 {
        self.state.read().await.session.navigation_epoch()
    }

    async fn accept(&self, record: GenerationRecord, epoch: u64) -> Result<GenerationRecord> {
        {
            let mut state = self.state.write().await;
            state.records.insert_front(record.clone());
            if state.session.navigation_epoch() == epoch {
                state.select_record(&record.id)?;
            } else {
                tracing::debug!(
                    record_id = %record.id,
                    "[GenerationOrchestrator] User navigated during request, not auto-selected"
                );
            }
        }
        tracing::info!(
            record_id = %record.id,
            results = record.results.len(),
            "[GenerationOrchestrator] Record accepted"
        );

        self.refresh_after_mutation().await;
        Ok(record)
    }

    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.history.refresh().await {
            tracing::warn!(error = %e, "[GenerationOrchestrator] Post-mutation refresh failed");
        }
    }
}

/// Trims the prompt and normalizes the model set.
pub(crate) fn validate_request(prompt: &str, models: &[String]) -> Result<(String, Vec<String>)> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(StudioError::validation("prompt must not be empty"));
    }
    let models = normalize_model_ids(models);
    if models.is_empty() {
        return Err(StudioError::validation("at least one model must be selected"));
    }
    Ok((prompt.to_string(), models))
}

pub(crate) fn generation_failed(prompt: &str, models: &[String], err: StudioError) -> StudioError {
    StudioError::GenerationFailed {
        prompt: prompt.to_string(),
        models: models.to_vec(),
        cause: cause_of(err),
    }
}

fn cause_of(err: StudioError) -> String {
    match err {
        StudioError::RequestFailed { cause, .. } => cause,
        other => other.to_string(),
    }
}
