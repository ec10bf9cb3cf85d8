//! Global subscriber setup.

use crate::layer::{StudioEvent, StudioEventLayer};
use strum::{Display, EnumString};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Logging is already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Output format of the log lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingOptions {
    /// `EnvFilter` directives, e.g. `"warn,molstudio_application=debug"`
    pub filter: String,
    pub format: LogFormat,
    /// Forward events at or above this level to a channel
    pub forward: Option<Level>,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            format: LogFormat::Pretty,
            forward: None,
        }
    }
}

/// Picks the filter directives: a non-blank `RUST_LOG` wins over `configured`.
pub fn resolve_filter(configured: &str, rust_log: Option<String>) -> String {
    rust_log
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| configured.to_string())
}

pub fn build_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|source| TelemetryError::InvalidFilter {
        filter: filter.to_string(),
        source,
    })
}

/// Installs the global subscriber.
///
/// Returns the receiving end of the event channel when `options.forward`
/// is set.
pub fn init_tracing(
    options: &TracingOptions,
) -> Result<Option<mpsc::UnboundedReceiver<StudioEvent>>, TelemetryError> {
    let filter = build_filter(&resolve_filter(
        &options.filter,
        std::env::var("RUST_LOG").ok(),
    ))?;

    let (pretty, json) = match options.format {
        LogFormat::Pretty => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
    };

    let (events, receiver) = match options.forward {
        Some(level) => {
            let (layer, receiver) = StudioEventLayer::channel();
            (Some(layer.with_min_level(level)), Some(receiver))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(events)
        .try_init()?;
    Ok(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_log_format_parses_case_insensitively() {
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
        assert!(LogFormat::from_str("xml").is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_rust_log_wins_over_configured_filter() {
        assert_eq!(resolve_filter("warn", None), "warn");
        assert_eq!(resolve_filter("warn", Some("  ".to_string())), "warn");
        assert_eq!(
            resolve_filter("warn", Some("molstudio_application=trace".to_string())),
            "molstudio_application=trace"
        );
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("warn").is_ok());
        assert!(build_filter("warn,molstudio_application=debug").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_bad_level() {
        let err = build_filter("molstudio_application=loud").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { ref filter, .. } if filter == "molstudio_application=loud"));
    }

    #[test]
    fn test_default_options() {
        let options = TracingOptions::default();
        assert_eq!(options.filter, "warn");
        assert_eq!(options.format, LogFormat::Pretty);
        assert!(options.forward.is_none());
    }
}
