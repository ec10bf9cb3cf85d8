use chrono::{DateTime, Utc};
use molstudio_core::experiment::Experiment;
use molstudio_core::molecule::{GenerationRecord, SingleModelResult};
use serde::Deserialize;

use super::timestamp;

/// Wire form of one model result.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleModelResultDto {
    pub model_name: String,
    pub smiles: String,
    #[serde(default)]
    pub confidence: f64,
    /// Seconds, as written by the backend's generation service
    #[serde(default)]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub execution_time_ms: Option<f64>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub is_valid: Option<bool>,
}

impl From<SingleModelResultDto> for SingleModelResult {
    fn from(dto: SingleModelResultDto) -> Self {
        let millis = dto
            .execution_time_ms
            .or_else(|| dto.execution_time.map(|secs| secs * 1000.0))
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .map(|ms| ms.round() as u64)
            .unwrap_or(0);
        let confidence = if dto.confidence.is_finite() {
            dto.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        SingleModelResult {
            model_name: dto.model_name,
            smiles: dto.smiles.trim().to_string(),
            confidence,
            execution_time_ms: millis,
            model_version: dto.model_version,
            is_valid: dto.is_valid,
        }
    }
}

/// Wire form of a generation record.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRecordDto {
    #[serde(default)]
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub results: Vec<SingleModelResultDto>,
    #[serde(default)]
    pub experiment_id: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GenerationRecordDto {
    /// Converts into the domain record.
    ///
    /// The id is mandatory: the backend owns record identity and a record
    /// without one cannot be tracked, so it is rejected rather than invented.
    pub fn into_domain(self) -> Result<GenerationRecord, String> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err("generation record is missing its id".to_string());
        }
        Ok(GenerationRecord {
            id,
            prompt: self.prompt,
            results: self.results.into_iter().map(Into::into).collect(),
            experiment_id: self.experiment_id.filter(|e| !e.is_empty()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Converts a history listing, skipping entries that cannot be tracked.
///
/// One malformed entry must not hide the rest of the history.
pub fn listing_into_domain(dtos: Vec<GenerationRecordDto>) -> Vec<GenerationRecord> {
    let total = dtos.len();
    let records: Vec<GenerationRecord> = dtos
        .into_iter()
        .enumerate()
        .filter_map(|(index, dto)| match dto.into_domain() {
            Ok(record) => Some(record),
            Err(cause) => {
                tracing::warn!(index, cause = %cause, "[GenerationRecordDto] Skipped listing entry");
                None
            }
        })
        .collect();
    if records.len() < total {
        tracing::warn!(
            skipped = total - records.len(),
            total,
            "[GenerationRecordDto] Listing had invalid entries"
        );
    }
    records
}

/// Wire form of an experiment.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub run_count: u32,
}

impl From<ExperimentDto> for Experiment {
    fn from(dto: ExperimentDto) -> Self {
        Experiment {
            id: dto.id,
            name: dto.name,
            description: dto.description.filter(|d| !d.is_empty()),
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            run_count: dto.run_count,
        }
    }
}
