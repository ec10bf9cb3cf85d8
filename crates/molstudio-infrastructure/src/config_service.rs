//! Configuration service.
//!
//! Loads [`RootConfig`] from `config.toml`, applies `MOLSTUDIO_*` environment
//! overrides, validates the result and caches it.

use crate::paths::StudioPaths;
use molstudio_core::config::RootConfig;
use molstudio_core::{Result, StudioError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub const ENV_BACKEND_URL: &str = "MOLSTUDIO_BACKEND_URL";
pub const ENV_API_KEY: &str = "MOLSTUDIO_API_KEY";
pub const ENV_DEBOUNCE_MS: &str = "MOLSTUDIO_DEBOUNCE_MS";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `<config_dir>/molstudio/config.toml`.
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(StudioPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    pub async fn get_config(&self) -> Result<RootConfig> {
        if let Some(cached) = self.cached() {
            return Ok(cached);
        }

        let mut config = Self::load_file(&self.path).await?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        config.validate()?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(config.clone());
        }
        Ok(config)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn cached(&self) -> Option<RootConfig> {
        self.config.read().ok().and_then(|lock| lock.clone())
    }

    /// Reads a config file; a missing file yields the defaults.
    async fn load_file(path: &Path) -> Result<RootConfig> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                tracing::debug!("[ConfigService] Loaded {}", path.display());
                let config: RootConfig = toml::from_str(&content).map_err(|e| {
                    StudioError::config(format!("{}: {}", path.display(), e))
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "[ConfigService] {} not found, using defaults",
                    path.display()
                );
                Ok(RootConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Applies environment overrides on top of file values.
///
/// `lookup` abstracts `std::env::var`; blank values are ignored.
pub fn apply_env_overrides(
    config: &mut RootConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = value(ENV_BACKEND_URL) {
        config.backend.base_url = url.trim().to_string();
    }
    if let Some(key) = value(ENV_API_KEY) {
        config.backend.api_key = Some(key);
    }
    if let Some(raw) = value(ENV_DEBOUNCE_MS) {
        config.viewport.debounce_ms = raw.trim().parse().map_err(|_| {
            StudioError::config(format!("{} must be an integer, got '{}'", ENV_DEBOUNCE_MS, raw))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = ConfigService::load_file(&dir.path().join("config.toml"))
            .await
            .unwrap();
        assert_eq!(loaded, RootConfig::default());
    }

    #[tokio::test]
    async fn test_file_values_are_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\nbase_url = \"http://gpu-box:9000\"\n\n[history]\nrefresh_interval_secs = 30\n",
        )
        .unwrap();

        let loaded = ConfigService::load_file(&path).await.unwrap();
        assert_eq!(loaded.backend.base_url, "http://gpu-box:9000");
        assert_eq!(loaded.history.refresh_interval_secs, Some(30));
    }

    #[tokio::test]
    async fn test_malformed_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend\n").unwrap();

        let err = ConfigService::load_file(&path).await.unwrap_err();
        match err {
            StudioError::Config(message) => assert!(message.contains("config.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = RootConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_BACKEND_URL, " https://prod.example.org "),
                (ENV_API_KEY, "secret"),
                (ENV_DEBOUNCE_MS, "300"),
            ]),
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://prod.example.org");
        assert_eq!(config.backend.api_key.as_deref(), Some("secret"));
        assert_eq!(config.viewport.debounce_ms, 300);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = RootConfig::default();
        apply_env_overrides(&mut config, env(&[(ENV_BACKEND_URL, "  ")])).unwrap();
        assert_eq!(config, RootConfig::default());
    }

    #[test]
    fn test_bad_debounce_override() {
        let mut config = RootConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(ENV_DEBOUNCE_MS, "soon")])).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[tokio::test]
    async fn test_service_caches_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[viewport]\ndebounce_ms = 100\n").unwrap();
        let service = ConfigService::new(&path);

        // Environment overrides may apply on developer machines; compare
        // against the first load rather than fixed values.
        let first = service.get_config().await.unwrap();
        std::fs::write(&path, "[viewport]\ndebounce_ms = 200\n").unwrap();
        assert_eq!(service.get_config().await.unwrap(), first);

        service.invalidate_cache();
        let reloaded = service.get_config().await.unwrap();
        if std::env::var(ENV_DEBOUNCE_MS).is_err() {
            assert_eq!(reloaded.viewport.debounce_ms, 200);
        }
    }
}
