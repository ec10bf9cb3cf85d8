//! Path management for molstudio configuration files.
//!
//! ```text
//! ~/.config/molstudio/        # Config directory (platform equivalent elsewhere)
//! └── config.toml             # Application configuration
//! ```

use molstudio_core::{Result, StudioError};
use std::path::PathBuf;

const APP_DIR: &str = "molstudio";
const CONFIG_FILE: &str = "config.toml";

/// Resolves platform directories for molstudio.
pub struct StudioPaths;

impl StudioPaths {
    /// Returns the molstudio configuration directory.
    ///
    /// # Errors
    ///
    /// Returns a config error when the platform has no config directory
    /// (for example, no home directory is set).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StudioError::config("Cannot find the user configuration directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
