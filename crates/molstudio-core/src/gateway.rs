//! Typed contract to the generation/chemistry backend.
//!
//! The backend is an external collaborator: model inference, 3-D coordinate
//! generation, docking and chat all live behind this trait. Implementations
//! map every transport, status or decode failure onto
//! [`StudioError::RequestFailed`](crate::error::StudioError::RequestFailed).

use crate::error::Result;
use crate::experiment::{Experiment, ExperimentCreate};
use crate::knowledge::{ChatReply, StructureDescription};
use crate::molecule::GenerationRecord;
use crate::simulation::DockingResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Backend operations, used to label request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Generate,
    GenerateInExperiment,
    Regenerate,
    #[serde(rename = "fetch_3d")]
    #[strum(serialize = "fetch_3d")]
    Fetch3d,
    ListHistory,
    UpdateDescription,
    ListExperiments,
    GetExperiment,
    CreateExperiment,
    ListExperimentRuns,
    RunDocking,
    Chat,
    DescribeStructure,
}

/// A 3-D structure returned by the backend for a SMILES string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure3d {
    /// MDL SDF block
    pub sdf: String,
}

/// The request/response contract consumed by the orchestration layer.
#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// Generates one result per requested model for a natural-language prompt.
    async fn generate(&self, prompt: &str, models: &[String]) -> Result<GenerationRecord>;

    /// Same as [`generate`](Self::generate), recorded as a run of an experiment.
    async fn generate_in_experiment(
        &self,
        experiment_id: &str,
        prompt: &str,
        models: &[String],
    ) -> Result<GenerationRecord>;

    /// Creates a new record from an existing record's prompt.
    async fn regenerate(&self, record_id: &str, models: &[String]) -> Result<GenerationRecord>;

    /// Fetches 3-D coordinates for a SMILES string.
    async fn fetch_3d(&self, smiles: &str) -> Result<Structure3d>;

    /// Lists persisted generation records, most recent first.
    async fn list_history(&self) -> Result<Vec<GenerationRecord>>;

    /// Replaces the prompt (description) of a persisted record.
    async fn update_description(&self, record_id: &str, prompt: &str) -> Result<()>;

    async fn list_experiments(&self) -> Result<Vec<Experiment>>;

    async fn get_experiment(&self, experiment_id: &str) -> Result<Experiment>;

    async fn create_experiment(&self, request: &ExperimentCreate) -> Result<Experiment>;

    /// Lists the generation runs of an experiment, most recent first.
    async fn list_experiment_runs(&self, experiment_id: &str) -> Result<Vec<GenerationRecord>>;

    async fn run_docking(&self, ligand_smiles: &str, target_id: &str) -> Result<DockingResult>;

    /// Asks the knowledge assistant; `session_id` continues an earlier conversation.
    async fn chat(&self, query: &str, session_id: Option<&str>) -> Result<ChatReply>;

    /// Produces a natural-language description of a structure.
    async fn describe_structure(
        &self,
        smiles: &str,
        additional_info: Option<&str>,
    ) -> Result<StructureDescription>;
}
