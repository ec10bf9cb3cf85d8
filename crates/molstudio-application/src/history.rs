//! Reconciliation of local history with the backend's listing.
//!
//! `refresh` is the single point where optimistic local writes and the
//! confirmed listing meet. A listing is applied only if it is the newest
//! refresh issued and no local write happened while it was in flight.

use crate::state::SharedState;
use molstudio_core::{RequestGateway, Result, StudioError};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What a refresh did to the local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Listing applied; the active record is still present (or none was set).
    Applied { records: usize },
    /// Listing applied; the active record vanished and the selection was cleared.
    SelectionCleared { records: usize, record_id: String },
    /// Superseded by a newer refresh or a local write; nothing changed.
    Discarded,
}

#[derive(Clone)]
pub struct HistorySynchronizer {
    gateway: Arc<dyn RequestGateway>,
    state: SharedState,
    issued: Arc<AtomicU64>,
}

impl HistorySynchronizer {
    pub fn new(gateway: Arc<dyn RequestGateway>, state: SharedState) -> Self {
        Self {
            gateway,
            state,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replaces the local history with the backend's listing.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` when the listing cannot be fetched; local state
    /// is left untouched.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let revision = self.state.read().await.records.local_revision();

        let listing = self.gateway.list_history().await?;

        let mut state = self.state.write().await;
        if ticket != self.issued.load(Ordering::SeqCst) {
            tracing::trace!(ticket, "[HistorySynchronizer] Refresh superseded, discarding");
            return Ok(RefreshOutcome::Discarded);
        }
        if state.records.local_revision() != revision {
            tracing::trace!(
                ticket,
                "[HistorySynchronizer] Refresh predates a local write, discarding"
            );
            return Ok(RefreshOutcome::Discarded);
        }

        state.records.replace_all(listing);
        let records = state.records.len();

        if let Some(overlay) = state.session.selection.overlay_result_key().cloned()
            && state.records.find_result(&overlay).is_none()
        {
            state.session.selection.clear_overlay();
            tracing::debug!(
                record_id = %overlay.record_id,
                model = %overlay.model_name,
                "[HistorySynchronizer] Overlay vanished, cleared"
            );
        }

        let Some(active_id) = state.session.selection.active_record_id().map(str::to_string) else {
            return Ok(RefreshOutcome::Applied { records });
        };
        if !state.records.contains(&active_id) {
            state.session.selection.clear();
            tracing::info!(
                record_id = %active_id,
                "[HistorySynchronizer] Active record no longer in history, selection cleared"
            );
            return Ok(RefreshOutcome::SelectionCleared {
                records,
                record_id: active_id,
            });
        }

        // Records are immutable server-side, but a listing may carry fewer
        // results than the optimistic copy did.
        let dangling = state
            .session
            .selection
            .active_result_key()
            .is_some_and(|key| state.records.find_result(key).is_none());
        if dangling {
            state.select_record(&active_id)?;
        }

        tracing::debug!(ticket, records, "[HistorySynchronizer] Listing applied");
        Ok(RefreshOutcome::Applied { records })
    }

    /// Refreshes every `interval` until `token` is cancelled.
    ///
    /// Failures are logged and the loop keeps going.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a zero interval; no task is spawned.
    pub fn spawn_periodic(
        &self,
        interval: Duration,
        token: CancellationToken,
    ) -> Result<JoinHandle<()>> {
        if interval.is_zero() {
            return Err(StudioError::validation("refresh interval must be positive"));
        }
        let this = self.clone();
        Ok(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!("[HistorySynchronizer] Periodic refresh stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = this.refresh().await {
                            tracing::warn!(error = %e, "[HistorySynchronizer] Periodic refresh failed");
                        }
                    }
                }
            }
        }))
    }
}
