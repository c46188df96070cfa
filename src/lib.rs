//! # Quran Gateway Library
//!
//! REST gateway in front of the Quran content API. Every content request
//! carries an OAuth2 client-credentials token taken from one shared,
//! single-flight token cache.
//!
//! Modules:
//! - `config`: service configuration, env expansion and validation
//! - `cache`: access token and the single-slot token cache
//! - `sources`: client-credentials token source
//! - `content`: upstream endpoints, HTTP client and content service
//! - `server`: axum router, handlers and transport layers

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::config::sources::ServiceConfig;
pub use crate::error::{GatewayError, GatewayResult};
