//! Experiment workbench: runs of one experiment and their comparison.

use crate::orchestrator::{generation_failed, validate_request};
use crate::selection::ComparisonSelection;
use molstudio_core::config::DualEviction;
use molstudio_core::experiment::{Experiment, ExperimentCreate};
use molstudio_core::session::ViewTarget;
use molstudio_core::{GenerationRecord, RecordStore, RequestGateway, Result, StudioError};
use std::sync::Arc;

/// State of the experiment detail view.
///
/// Runs live in their own store, separate from the dashboard history.
pub struct ExperimentWorkbench {
    gateway: Arc<dyn RequestGateway>,
    experiment: Option<Experiment>,
    runs: RecordStore,
    comparison: ComparisonSelection,
}

impl ExperimentWorkbench {
    pub fn new(gateway: Arc<dyn RequestGateway>, eviction: DualEviction) -> Self {
        Self {
            gateway,
            experiment: None,
            runs: RecordStore::new(),
            comparison: ComparisonSelection::new(eviction),
        }
    }

    pub async fn list(&self) -> Result<Vec<Experiment>> {
        self.gateway.list_experiments().await
    }

    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Experiment> {
        let request = ExperimentCreate::new(name, description)?;
        let experiment = self.gateway.create_experiment(&request).await?;
        tracing::info!(
            "[ExperimentWorkbench] Created experiment {} ({})",
            experiment.name,
            experiment.id
        );
        Ok(experiment)
    }

    /// Loads an experiment and its runs; the most recent run is selected.
    pub async fn open(&mut self, experiment_id: &str) -> Result<&Experiment> {
        let (experiment, runs) = tokio::try_join!(
            self.gateway.get_experiment(experiment_id),
            self.gateway.list_experiment_runs(experiment_id),
        )?;

        self.runs = RecordStore::from_records(runs);
        self.comparison.clear();
        if let Some(first) = self.runs.head() {
            self.comparison.select_only(&first.id);
        }
        tracing::debug!(
            "[ExperimentWorkbench] Opened {} with {} run(s)",
            experiment.id,
            self.runs.len()
        );
        Ok(self.experiment.insert(experiment))
    }

    /// Runs a generation inside the open experiment and selects it alone.
    pub async fn generate(&mut self, prompt: &str, models: &[String]) -> Result<GenerationRecord> {
        let experiment_id = self
            .experiment
            .as_ref()
            .map(|e| e.id.clone())
            .ok_or_else(|| StudioError::validation("no experiment is open"))?;
        let (prompt, models) = validate_request(prompt, models)?;

        let mut run = self
            .gateway
            .generate_in_experiment(&experiment_id, &prompt, &models)
            .await
            .map_err(|e| generation_failed(&prompt, &models, e))?;
        run.experiment_id.get_or_insert(experiment_id);

        self.runs.insert_front(run.clone());
        if let Some(experiment) = self.experiment.as_mut() {
            experiment.run_count += 1;
        }
        self.comparison.select_only(&run.id);
        Ok(run)
    }

    /// Adds or removes a run from the comparison. Returns whether it is selected.
    pub fn toggle_run(&mut self, run_id: &str) -> Result<bool> {
        if !self.runs.contains(run_id) {
            return Err(StudioError::not_found("ExperimentRun", run_id));
        }
        Ok(self.comparison.toggle(run_id))
    }

    /// Primary and overlay structures of the compared runs.
    pub fn view(&self) -> ViewTarget {
        self.comparison.view(&self.runs)
    }

    pub fn experiment(&self) -> Option<&Experiment> {
        self.experiment.as_ref()
    }

    pub fn runs(&self) -> &[GenerationRecord] {
        self.runs.records()
    }

    pub fn selected_runs(&self) -> &[String] {
        self.comparison.selected()
    }
}
