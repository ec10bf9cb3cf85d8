//! HTTP implementation of [`RequestGateway`].
//!
//! Talks JSON to the generation backend under `<base_url>/api/...`. Every
//! transport, status or decode failure is reported as
//! `StudioError::RequestFailed` labelled with the operation that failed.

use crate::dto::{ExperimentDto, GenerationRecordDto, listing_into_domain};
use async_trait::async_trait;
use molstudio_core::config::BackendConfig;
use molstudio_core::experiment::{Experiment, ExperimentCreate};
use molstudio_core::knowledge::{ChatReply, StructureDescription};
use molstudio_core::molecule::GenerationRecord;
use molstudio_core::simulation::DockingResult;
use molstudio_core::{Operation, RequestGateway, Result, Structure3d, StudioError};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    models: &'a [String],
}

#[derive(Debug, Serialize)]
struct RegenerateBody<'a> {
    models: &'a [String],
}

#[derive(Debug, Serialize)]
struct DescriptionBody<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct DockingBody<'a> {
    ligand_smiles: &'a str,
    target_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Mol2TextBody<'a> {
    smiles: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_info: Option<&'a str>,
}

/// Gateway to the molstudio backend over HTTP.
#[derive(Clone)]
pub struct HttpRequestGateway {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpRequestGateway {
    /// Creates a gateway for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| StudioError::config(format!("Invalid backend URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StudioError::config(format!(
                "Backend URL '{}' cannot carry API paths",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StudioError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let gateway = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        Ok(gateway.with_api_key(config.api_key.clone()))
    }

    /// Sets the bearer token sent with every request.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, operation: Operation, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StudioError::request_failed(operation, "backend URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StudioError::request_failed(operation, format!("transport error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                "[HttpRequestGateway] {} returned {}: {}",
                operation,
                status,
                error_text
            );
            return Err(StudioError::request_failed(
                operation,
                format!("backend error ({}): {}", status, error_text),
            ));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(operation, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StudioError::request_failed(operation, format!("invalid response body: {}", e)))
    }

    async fn send_empty(&self, operation: Operation, request: RequestBuilder) -> Result<()> {
        self.send(operation, request).await.map(|_| ())
    }

    async fn send_record(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<GenerationRecord> {
        let dto: GenerationRecordDto = self.send_json(operation, request).await?;
        dto.into_domain()
            .map_err(|cause| StudioError::request_failed(operation, cause))
    }

    /// Listings skip invalid entries; single-record responses reject them.
    async fn send_records(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Vec<GenerationRecord>> {
        let dtos: Vec<GenerationRecordDto> = self.send_json(operation, request).await?;
        Ok(listing_into_domain(dtos))
    }
}

#[async_trait]
impl RequestGateway for HttpRequestGateway {
    async fn generate(&self, prompt: &str, models: &[String]) -> Result<GenerationRecord> {
        let operation = Operation::Generate;
        let url = self.endpoint(operation, &["api", "molecules", "generate"])?;
        tracing::debug!("[HttpRequestGateway] POST {} ({} models)", url, models.len());

        let request = self.client.post(url).json(&GenerateBody { prompt, models });
        self.send_record(operation, request).await
    }

    async fn generate_in_experiment(
        &self,
        experiment_id: &str,
        prompt: &str,
        models: &[String],
    ) -> Result<GenerationRecord> {
        let operation = Operation::GenerateInExperiment;
        let url = self.endpoint(operation, &["api", "experiments", experiment_id, "generate"])?;
        tracing::debug!("[HttpRequestGateway] POST {}", url);

        let request = self.client.post(url).json(&GenerateBody { prompt, models });
        self.send_record(operation, request).await
    }

    async fn regenerate(&self, record_id: &str, models: &[String]) -> Result<GenerationRecord> {
        let operation = Operation::Regenerate;
        let url = self.endpoint(operation, &["api", "molecules", "regenerate", record_id])?;
        tracing::debug!("[HttpRequestGateway] POST {}", url);

        let request = self.client.post(url).json(&RegenerateBody { models });
        self.send_record(operation, request).await
    }

    async fn fetch_3d(&self, smiles: &str) -> Result<Structure3d> {
        let operation = Operation::Fetch3d;
        let url = self.endpoint(operation, &["api", "molecules", "3d"])?;
        let request = self.client.get(url).query(&[("smiles", smiles)]);

        let structure: Structure3d = self.send_json(operation, request).await?;
        if structure.sdf.trim().is_empty() {
            return Err(StudioError::request_failed(
                operation,
                format!("empty SDF for '{}'", smiles),
            ));
        }
        Ok(structure)
    }

    async fn list_history(&self) -> Result<Vec<GenerationRecord>> {
        let operation = Operation::ListHistory;
        let url = self.endpoint(operation, &["api", "molecules", "history"])?;
        self.send_records(operation, self.client.get(url)).await
    }

    async fn update_description(&self, record_id: &str, prompt: &str) -> Result<()> {
        let operation = Operation::UpdateDescription;
        let url = self.endpoint(operation, &["api", "molecules", "history", record_id])?;
        tracing::debug!("[HttpRequestGateway] PATCH {}", url);

        let request = self.client.patch(url).json(&DescriptionBody { prompt });
        self.send_empty(operation, request).await
    }

    async fn list_experiments(&self) -> Result<Vec<Experiment>> {
        let operation = Operation::ListExperiments;
        let url = self.endpoint(operation, &["api", "experiments"])?;
        let dtos: Vec<ExperimentDto> = self.send_json(operation, self.client.get(url)).await?;
        Ok(dtos.into_iter().map(Experiment::from).collect())
    }

    async fn get_experiment(&self, experiment_id: &str) -> Result<Experiment> {
        let operation = Operation::GetExperiment;
        let url = self.endpoint(operation, &["api", "experiments", experiment_id])?;
        let dto: ExperimentDto = self.send_json(operation, self.client.get(url)).await?;
        Ok(dto.into())
    }

    async fn create_experiment(&self, request: &ExperimentCreate) -> Result<Experiment> {
        let operation = Operation::CreateExperiment;
        let url = self.endpoint(operation, &["api", "experiments"])?;
        let dto: ExperimentDto = self
            .send_json(operation, self.client.post(url).json(request))
            .await?;
        Ok(dto.into())
    }

    async fn list_experiment_runs(&self, experiment_id: &str) -> Result<Vec<GenerationRecord>> {
        let operation = Operation::ListExperimentRuns;
        let url = self.endpoint(operation, &["api", "experiments", experiment_id, "runs"])?;
        self.send_records(operation, self.client.get(url)).await
    }

    async fn run_docking(&self, ligand_smiles: &str, target_id: &str) -> Result<DockingResult> {
        let operation = Operation::RunDocking;
        let url = self.endpoint(operation, &["api", "simulation", "docking", "run"])?;
        tracing::debug!("[HttpRequestGateway] POST {} target={}", url, target_id);

        let request = self.client.post(url).json(&DockingBody {
            ligand_smiles,
            target_id,
        });
        self.send_json(operation, request).await
    }

    async fn chat(&self, query: &str, session_id: Option<&str>) -> Result<ChatReply> {
        let operation = Operation::Chat;
        let url = self.endpoint(operation, &["api", "knowledge", "chat"])?;
        let request = self.client.post(url).json(&ChatBody { query, session_id });
        self.send_json(operation, request).await
    }

    async fn describe_structure(
        &self,
        smiles: &str,
        additional_info: Option<&str>,
    ) -> Result<StructureDescription> {
        let operation = Operation::DescribeStructure;
        let url = self.endpoint(operation, &["api", "knowledge", "mol2text"])?;
        let request = self.client.post(url).json(&Mol2TextBody {
            smiles,
            additional_info,
        });
        self.send_json(operation, request).await
    }
}
