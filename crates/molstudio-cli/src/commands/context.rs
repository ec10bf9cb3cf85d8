use super::output::Output;
use anyhow::{Context, Result};
use molstudio_application::{GenerationOrchestrator, HistorySynchronizer, SharedState, StudioState};
use molstudio_core::RequestGateway;
use molstudio_core::config::RootConfig;
use molstudio_core::session::Session;
use molstudio_infrastructure::{ConfigService, HttpRequestGateway};
use std::path::Path;
use std::sync::Arc;

/// Everything a command needs: resolved config, backend and output mode.
pub struct CommandContext {
    pub config: RootConfig,
    pub gateway: Arc<dyn RequestGateway>,
    pub output: Output,
}

impl CommandContext {
    pub async fn load(
        config_path: Option<&Path>,
        backend_url: Option<&str>,
        json: bool,
    ) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::new(path),
            None => ConfigService::new_default().context("Failed to locate config directory")?,
        };
        let mut config = service
            .get_config()
            .await
            .with_context(|| format!("Failed to load {}", service.path().display()))?;

        if let Some(url) = backend_url {
            config.backend.base_url = url.trim().to_string();
            config.validate()?;
        }

        let gateway = HttpRequestGateway::from_config(&config.backend)?;
        tracing::debug!("[CLI] Backend {}", gateway.base_url());

        Ok(Self {
            config,
            gateway: Arc::new(gateway),
            output: Output::new(json),
        })
    }

    /// Fresh session state preselecting the configured models.
    pub fn state(&self) -> SharedState {
        StudioState::new(Session::new(self.config.models.default.iter().cloned())).into_shared()
    }

    pub fn history(&self, state: &SharedState) -> HistorySynchronizer {
        HistorySynchronizer::new(self.gateway.clone(), state.clone())
    }

    pub fn orchestrator(&self, state: &SharedState) -> GenerationOrchestrator {
        GenerationOrchestrator::new(self.gateway.clone(), state.clone(), self.history(state))
    }

    /// The requested models, or the configured defaults when none were given.
    pub fn models_or_default(&self, models: Vec<String>) -> Vec<String> {
        if models.is_empty() {
            self.config.models.default.clone()
        } else {
            models
        }
    }
}
