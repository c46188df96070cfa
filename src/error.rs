use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the token cache, the content client and the
/// inbound request extractors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Client-credentials exchange failed: transport error, timeout,
    /// non-2xx status or malformed payload.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Inbound path or query parameter is missing or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Content call failed after a token was obtained.
    #[error("upstream fetch of '{endpoint}' failed: {message}")]
    UpstreamFetchFailed {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::AuthenticationFailed(_) => "authentication_failed",
            GatewayError::InvalidRequest(_) => "bad_request",
            GatewayError::UpstreamFetchFailed { .. } => "upstream_fetch_failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthenticationFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamFetchFailed { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn upstream(endpoint: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        GatewayError::UpstreamFetchFailed {
            endpoint: endpoint.to_owned(),
            status,
            message: message.into(),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
