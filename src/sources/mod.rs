//! Token sources
//!
//! A source performs the network exchange that yields a fresh access token.
//! The cache only depends on the `FetchToken` seam; `ClientCredentialsSource`
//! is the production implementation.

use std::future::Future;

use serde::Deserialize;

use crate::error::GatewayResult;

pub mod fetch;
pub mod oauth2;

pub use oauth2::ClientCredentialsSource;

/// Successful token endpoint answer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until expiry, relative to the response time.
    pub expires_in: u64,
}

pub trait FetchToken: Send + Sync {
    fn fetch_token(&self) -> impl Future<Output = GatewayResult<TokenResponse>> + Send;
}
