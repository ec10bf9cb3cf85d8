//! Logging setup for molstudio binaries.
//!
//! [`init_tracing`] installs the global subscriber; [`StudioEventLayer`]
//! forwards warnings and errors to a channel so a front end can surface them.

pub mod init;
pub mod layer;

pub use init::{LogFormat, TelemetryError, TracingOptions, init_tracing, resolve_filter};
pub use layer::{StudioEvent, StudioEventLayer};
