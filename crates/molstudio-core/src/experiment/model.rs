use crate::error::{Result, StudioError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named collection of generation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of runs recorded under this experiment
    #[serde(default)]
    pub run_count: u32,
}

/// Request body for creating an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExperimentCreate {
    /// Builds a request, trimming the name and dropping a blank description.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudioError::validation("experiment name must not be empty"));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(Self {
            name: name.to_string(),
            description,
        })
    }
}
