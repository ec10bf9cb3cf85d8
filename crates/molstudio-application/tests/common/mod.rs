//! In-memory stand-ins for the backend, the 3-D renderer and the 2-D editor.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use molstudio_core::editor::StructureEditor;
use molstudio_core::experiment::{Experiment, ExperimentCreate};
use molstudio_core::knowledge::{ChatReply, StructureDescription};
use molstudio_core::render::{AtomStyle, AtomSelector, ModelFormat, ModelIndex, StructureRenderer};
use molstudio_core::simulation::{DockingResult, ScoreBreakdown};
use molstudio_core::{
    GenerationRecord, Operation, RequestGateway, Result, SingleModelResult, Structure3d,
    StudioError,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

// ============================================================================
// MockGateway
// ============================================================================

#[derive(Default)]
struct Backend {
    history: Vec<GenerationRecord>,
    experiments: Vec<Experiment>,
    next_id: u64,
    failing: HashSet<Operation>,
    reuse_source_id: bool,
    regenerated_id: Option<String>,
    generate_delay: Option<Duration>,
    prompt_delays: HashMap<String, Duration>,
    history_delays: Vec<Duration>,
    fetch_delays: HashMap<String, Duration>,
    fetch_failures: HashSet<String>,
    fetch_calls: Vec<(String, Instant)>,
    calls: Vec<Operation>,
    chat_calls: Vec<(String, Option<String>)>,
}

/// A fake backend: generations are persisted and listed back like the real
/// service does.
#[derive(Default)]
pub struct MockGateway {
    backend: Mutex<Backend>,
}

pub fn smiles_for(prompt: &str) -> &'static str {
    match prompt {
        "ethanol" => "CCO",
        "benzene" => "c1ccccc1",
        "aspirin" => "CC(=O)Oc1ccccc1C(=O)O",
        _ => "C",
    }
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, operation: Operation) {
        self.backend.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.backend.lock().unwrap().failing.remove(&operation);
    }

    pub fn reuse_source_id(&self) {
        self.backend.lock().unwrap().reuse_source_id = true;
    }

    /// The next regenerations answer with `record_id` as the new record's id.
    pub fn answer_regenerate_with_id(&self, record_id: &str) {
        self.backend.lock().unwrap().regenerated_id = Some(record_id.to_string());
    }

    pub fn set_generate_delay(&self, delay: Duration) {
        self.backend.lock().unwrap().generate_delay = Some(delay);
    }

    /// Delay for generations of `prompt`, taking precedence over the default.
    pub fn set_prompt_delay(&self, prompt: &str, delay: Duration) {
        self.backend
            .lock()
            .unwrap()
            .prompt_delays
            .insert(prompt.to_string(), delay);
    }

    /// Delays for the next `list_history` calls, in call order.
    pub fn queue_history_delays(&self, delays: &[Duration]) {
        self.backend.lock().unwrap().history_delays.extend_from_slice(delays);
    }

    pub fn set_fetch_delay(&self, smiles: &str, delay: Duration) {
        self.backend
            .lock()
            .unwrap()
            .fetch_delays
            .insert(smiles.to_string(), delay);
    }

    pub fn fail_fetch(&self, smiles: &str) {
        self.backend
            .lock()
            .unwrap()
            .fetch_failures
            .insert(smiles.to_string());
    }

    pub fn seed(&self, record: GenerationRecord) {
        self.backend.lock().unwrap().history.insert(0, record);
    }

    pub fn seed_experiment(&self, experiment: Experiment) {
        self.backend.lock().unwrap().experiments.push(experiment);
    }

    /// Deletes a record server-side.
    pub fn remove(&self, record_id: &str) {
        self.backend
            .lock()
            .unwrap()
            .history
            .retain(|r| r.id != record_id);
    }

    pub fn server_record(&self, record_id: &str) -> Option<GenerationRecord> {
        self.backend
            .lock()
            .unwrap()
            .history
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.backend.lock().unwrap().calls.clone()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.calls().iter().filter(|op| **op == operation).count()
    }

    pub fn fetch_calls(&self) -> Vec<(String, Instant)> {
        self.backend.lock().unwrap().fetch_calls.clone()
    }

    pub fn chat_calls(&self) -> Vec<(String, Option<String>)> {
        self.backend.lock().unwrap().chat_calls.clone()
    }

    fn begin(&self, operation: Operation) -> Result<()> {
        let mut backend = self.backend.lock().unwrap();
        backend.calls.push(operation);
        if backend.failing.contains(&operation) {
            return Err(StudioError::request_failed(operation, "backend error (503): unavailable"));
        }
        Ok(())
    }

    fn build_record(
        &self,
        prompt: &str,
        models: &[String],
        experiment_id: Option<&str>,
    ) -> GenerationRecord {
        let mut backend = self.backend.lock().unwrap();
        backend.next_id += 1;
        let base = smiles_for(prompt);
        let record = GenerationRecord {
            id: format!("rec-{}", backend.next_id),
            prompt: prompt.to_string(),
            results: models
                .iter()
                .enumerate()
                .map(|(i, model)| SingleModelResult {
                    model_name: model.clone(),
                    smiles: format!("{}{}", base, "C".repeat(i)),
                    confidence: 0.9,
                    execution_time_ms: 250,
                    model_version: Some("1.0.0".to_string()),
                    is_valid: Some(true),
                })
                .collect(),
            experiment_id: experiment_id.map(str::to_string),
            created_at: Utc::now(),
            updated_at: None,
        };
        backend.history.insert(0, record.clone());
        if let Some(id) = experiment_id
            && let Some(experiment) = backend.experiments.iter_mut().find(|e| e.id == id)
        {
            experiment.run_count += 1;
        }
        record
    }

    async fn generate_delay(&self, prompt: &str) {
        let delay = {
            let backend = self.backend.lock().unwrap();
            backend
                .prompt_delays
                .get(prompt)
                .copied()
                .or(backend.generate_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RequestGateway for MockGateway {
    async fn generate(&self, prompt: &str, models: &[String]) -> Result<GenerationRecord> {
        self.begin(Operation::Generate)?;
        self.generate_delay(prompt).await;
        Ok(self.build_record(prompt, models, None))
    }

    async fn generate_in_experiment(
        &self,
        experiment_id: &str,
        prompt: &str,
        models: &[String],
    ) -> Result<GenerationRecord> {
        self.begin(Operation::GenerateInExperiment)?;
        self.generate_delay(prompt).await;
        Ok(self.build_record(prompt, models, Some(experiment_id)))
    }

    async fn regenerate(&self, record_id: &str, models: &[String]) -> Result<GenerationRecord> {
        self.begin(Operation::Regenerate)?;
        let (source, reuse, forced_id) = {
            let backend = self.backend.lock().unwrap();
            let source = backend.history.iter().find(|r| r.id == record_id).cloned();
            (source, backend.reuse_source_id, backend.regenerated_id.clone())
        };
        let source = source.ok_or_else(|| {
            StudioError::request_failed(Operation::Regenerate, "backend error (404): not found")
        })?;
        if reuse {
            return Ok(source);
        }
        let record = self.build_record(&source.prompt, models, source.experiment_id.as_deref());
        Ok(match forced_id {
            Some(id) => GenerationRecord { id, ..record },
            None => record,
        })
    }

    async fn fetch_3d(&self, smiles: &str) -> Result<Structure3d> {
        let (delay, fails) = {
            let mut backend = self.backend.lock().unwrap();
            backend.calls.push(Operation::Fetch3d);
            backend
                .fetch_calls
                .push((smiles.to_string(), Instant::now()));
            (
                backend.fetch_delays.get(smiles).copied(),
                backend.fetch_failures.contains(smiles),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fails {
            return Err(StudioError::request_failed(
                Operation::Fetch3d,
                format!("backend error (400): cannot embed '{}'", smiles),
            ));
        }
        Ok(Structure3d {
            sdf: format!("SDF:{}", smiles),
        })
    }

    async fn list_history(&self) -> Result<Vec<GenerationRecord>> {
        self.begin(Operation::ListHistory)?;
        let (snapshot, delay) = {
            let mut backend = self.backend.lock().unwrap();
            let delay = if backend.history_delays.is_empty() {
                None
            } else {
                Some(backend.history_delays.remove(0))
            };
            (backend.history.clone(), delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn update_description(&self, record_id: &str, prompt: &str) -> Result<()> {
        self.begin(Operation::UpdateDescription)?;
        let mut backend = self.backend.lock().unwrap();
        let record = backend
            .history
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| {
                StudioError::request_failed(
                    Operation::UpdateDescription,
                    "backend error (404): not found",
                )
            })?;
        record.prompt = prompt.to_string();
        record.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn list_experiments(&self) -> Result<Vec<Experiment>> {
        self.begin(Operation::ListExperiments)?;
        Ok(self.backend.lock().unwrap().experiments.clone())
    }

    async fn get_experiment(&self, experiment_id: &str) -> Result<Experiment> {
        self.begin(Operation::GetExperiment)?;
        self.backend
            .lock()
            .unwrap()
            .experiments
            .iter()
            .find(|e| e.id == experiment_id)
            .cloned()
            .ok_or_else(|| {
                StudioError::request_failed(
                    Operation::GetExperiment,
                    "backend error (404): Experiment not found",
                )
            })
    }

    async fn create_experiment(&self, request: &ExperimentCreate) -> Result<Experiment> {
        self.begin(Operation::CreateExperiment)?;
        let mut backend = self.backend.lock().unwrap();
        backend.next_id += 1;
        let now = Utc::now();
        let experiment = Experiment {
            id: format!("exp-{}", backend.next_id),
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
            updated_at: now,
            run_count: 0,
        };
        backend.experiments.push(experiment.clone());
        Ok(experiment)
    }

    async fn list_experiment_runs(&self, experiment_id: &str) -> Result<Vec<GenerationRecord>> {
        self.begin(Operation::ListExperimentRuns)?;
        Ok(self
            .backend
            .lock()
            .unwrap()
            .history
            .iter()
            .filter(|r| r.experiment_id.as_deref() == Some(experiment_id))
            .cloned()
            .collect())
    }

    async fn run_docking(&self, ligand_smiles: &str, target_id: &str) -> Result<DockingResult> {
        self.begin(Operation::RunDocking)?;
        Ok(DockingResult {
            affinity: -7.4,
            ligand_pdb: format!("LIGAND {}", ligand_smiles),
            target_pdb: format!("TARGET {}", target_id),
            score_breakdown: ScoreBreakdown {
                van_der_waals: -4.1,
                electrostatic: -2.2,
                desolvation: -1.1,
            },
        })
    }

    async fn chat(&self, query: &str, session_id: Option<&str>) -> Result<ChatReply> {
        {
            let mut backend = self.backend.lock().unwrap();
            backend
                .chat_calls
                .push((query.to_string(), session_id.map(str::to_string)));
        }
        self.begin(Operation::Chat)?;
        Ok(ChatReply {
            answer: format!("About {}", query),
            session_id: session_id.unwrap_or("sess-1").to_string(),
            sources: vec!["PubChem".to_string()],
        })
    }

    async fn describe_structure(
        &self,
        smiles: &str,
        _additional_info: Option<&str>,
    ) -> Result<StructureDescription> {
        self.begin(Operation::DescribeStructure)?;
        Ok(StructureDescription {
            smiles: smiles.to_string(),
            description: format!("A molecule written as {}", smiles),
            success: true,
            error: None,
        })
    }
}

// ============================================================================
// RecordingRenderer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Clear,
    AddModel { data: String, format: ModelFormat },
    SetStyle { model: Option<usize>, style: AtomStyle },
    ZoomTo,
    Render,
}

/// Renderer that records every call; clones share the log.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<RenderCall>>>,
    models: Arc<Mutex<usize>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn render_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == RenderCall::Render)
            .count()
    }

    pub fn clear_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == RenderCall::Clear)
            .count()
    }

    /// Model data added since the last clear.
    pub fn scene(&self) -> Vec<String> {
        let mut scene = Vec::new();
        for call in self.calls() {
            match call {
                RenderCall::Clear => scene.clear(),
                RenderCall::AddModel { data, .. } => scene.push(data),
                _ => {}
            }
        }
        scene
    }
}

impl StructureRenderer for RecordingRenderer {
    fn clear(&mut self) {
        *self.models.lock().unwrap() = 0;
        self.calls.lock().unwrap().push(RenderCall::Clear);
    }

    fn add_model(&mut self, data: &str, format: ModelFormat) -> ModelIndex {
        let mut models = self.models.lock().unwrap();
        let index = ModelIndex(*models);
        *models += 1;
        self.calls.lock().unwrap().push(RenderCall::AddModel {
            data: data.to_string(),
            format,
        });
        index
    }

    fn set_style(&mut self, selector: &AtomSelector, style: &AtomStyle) {
        self.calls.lock().unwrap().push(RenderCall::SetStyle {
            model: selector.model,
            style: style.clone(),
        });
    }

    fn zoom_to(&mut self) {
        self.calls.lock().unwrap().push(RenderCall::ZoomTo);
    }

    fn render(&mut self) {
        self.calls.lock().unwrap().push(RenderCall::Render);
    }
}

// ============================================================================
// MockEditor
// ============================================================================

#[derive(Default)]
struct EditorLog {
    smiles: String,
    undo: Vec<String>,
    redo: Vec<String>,
}

/// Editor with a linear undo history; clones share state.
#[derive(Clone, Default)]
pub struct MockEditor {
    log: Arc<Mutex<EditorLog>>,
}

impl MockEditor {
    /// Simulates the user drawing a structure.
    pub fn draw(&self, smiles: &str) {
        let mut log = self.log.lock().unwrap();
        let previous = std::mem::replace(&mut log.smiles, smiles.to_string());
        log.undo.push(previous);
        log.redo.clear();
    }
}

impl StructureEditor for MockEditor {
    fn reset(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.smiles.clear();
        log.undo.clear();
        log.redo.clear();
    }

    fn undo(&mut self) {
        let mut log = self.log.lock().unwrap();
        if let Some(previous) = log.undo.pop() {
            let current = std::mem::replace(&mut log.smiles, previous);
            log.redo.push(current);
        }
    }

    fn redo(&mut self) {
        let mut log = self.log.lock().unwrap();
        if let Some(next) = log.redo.pop() {
            let current = std::mem::replace(&mut log.smiles, next);
            log.undo.push(current);
        }
    }

    fn get_smiles(&self) -> String {
        self.log.lock().unwrap().smiles.clone()
    }

    fn set_smiles(&mut self, smiles: &str) {
        self.draw(smiles);
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn models(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn record(id: &str, prompt: &str, results: &[(&str, &str)]) -> GenerationRecord {
    GenerationRecord {
        id: id.to_string(),
        prompt: prompt.to_string(),
        results: results
            .iter()
            .map(|(model, smiles)| SingleModelResult {
                model_name: model.to_string(),
                smiles: smiles.to_string(),
                confidence: 0.75,
                execution_time_ms: 100,
                model_version: None,
                is_valid: Some(true),
            })
            .collect(),
        experiment_id: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Lets spawned tasks run to their next suspension point.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
