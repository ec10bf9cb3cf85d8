//! Infrastructure layer for molstudio.
//!
//! The reqwest-backed [`HttpRequestGateway`], wire DTOs and the
//! configuration service.

pub mod config_service;
pub mod dto;
pub mod http_gateway;
pub mod paths;

pub use config_service::ConfigService;
pub use http_gateway::HttpRequestGateway;
pub use paths::StudioPaths;
