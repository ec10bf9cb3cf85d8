//! Root configuration model.
//!
//! Every field has a default, so an empty `config.toml` is valid. Loading and
//! environment overrides live in the infrastructure crate.

use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumString};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_DEBOUNCE_MS: u64 = 800;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RootConfig {
    pub backend: BackendConfig,
    pub viewport: ViewportConfig,
    pub history: HistoryConfig,
    pub selection: SelectionConfig,
    pub models: ModelsConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend; API paths are appended to it
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent as a bearer token when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Quiet period before a structure change is fetched and rendered
    pub debounce_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct HistoryConfig {
    /// Background refresh period; no background refresh when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval_secs: Option<u64>,
}

/// What happens when a third run is picked for comparison.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DualEviction {
    /// The first pick stays as primary; the second slot is replaced.
    #[default]
    PinnedPrimary,
    /// The oldest pick is dropped; the remaining one becomes primary.
    Rotate,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SelectionConfig {
    pub dual_eviction: DualEviction,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelsConfig {
    /// Models preselected for a new session
    pub default: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: vec!["your_model".to_string()],
        }
    }
}

impl RootConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StudioError::config(format!(
                "backend.base_url must be an http(s) URL, got '{}'",
                self.backend.base_url
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(StudioError::config("backend.timeout_secs must be positive"));
        }
        if self.history.refresh_interval_secs == Some(0) {
            return Err(StudioError::config(
                "history.refresh_interval_secs must be positive when set",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.viewport.debounce_ms)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.history.refresh_interval_secs.map(Duration::from_secs)
    }
}
