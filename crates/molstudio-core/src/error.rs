//! Error types for molstudio.

use crate::gateway::Operation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire molstudio workspace.
///
/// Validation errors are raised before any I/O. Request failures carry
/// enough context (operation, prompt/models or record id) for the caller to
/// retry the same call.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StudioError {
    /// Bad input, rejected before reaching the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or backend failure for a single gateway operation
    #[error("Request failed: {operation} - {cause}")]
    RequestFailed { operation: Operation, cause: String },

    /// A generate call failed; the original request is kept for retry
    #[error("Generation failed for prompt '{prompt}' with models [{}]: {cause}", .models.join(", "))]
    GenerationFailed {
        prompt: String,
        models: Vec<String>,
        cause: String,
    },

    /// A regenerate call failed; the source record is kept for retry
    #[error("Regeneration of record '{record_id}' with models [{}] failed: {cause}", .models.join(", "))]
    RegenerationFailed {
        record_id: String,
        models: Vec<String>,
        cause: String,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (config files, output files)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudioError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a RequestFailed error for the given gateway operation
    pub fn request_failed(operation: Operation, cause: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation,
            cause: cause.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if re-invoking the same call may succeed.
    ///
    /// Backend failures are retryable; bad input and local state errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { .. } | Self::GenerationFailed { .. } | Self::RegenerationFailed { .. }
        )
    }

    /// Returns the gateway operation that failed, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::RequestFailed { operation, .. } => Some(*operation),
            Self::GenerationFailed { .. } => Some(Operation::Generate),
            Self::RegenerationFailed { .. } => Some(Operation::Regenerate),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StudioError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StudioError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for StudioError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, StudioError>`.
pub type Result<T> = std::result::Result<T, StudioError>;
