use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, error};

use crate::config::sources::AuthConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::sources::fetch::prepare_generic_source_value;
use crate::sources::{FetchToken, TokenResponse};
use crate::utils::constants::{DEFAULT_AUTH_SCOPE, GRANT_TYPE_CLIENT_CREDENTIALS};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// OAuth2 client-credentials exchange against the configured auth url.
#[derive(Debug, Clone)]
pub struct ClientCredentialsSource {
    pub url: String,
    pub client_id: String,
    client_secret: String,
    pub scope: String,
    client: Client,
}

impl ClientCredentialsSource {
    pub fn new(
        url: String,
        client_id: String,
        client_secret: String,
        scope: String,
        client: Client,
    ) -> Self {
        Self { url, client_id, client_secret, scope, client }
    }

    /// Resolve credentials from config (literal, env or file).
    pub fn from_config(auth_config: &AuthConfig, client: Client) -> Result<Self> {
        let client_id = prepare_generic_source_value(&auth_config.client_id)?;
        let client_secret = prepare_generic_source_value(&auth_config.client_secret)?;
        let scope = auth_config
            .scope
            .clone()
            .unwrap_or_else(|| DEFAULT_AUTH_SCOPE.to_owned());

        Ok(Self::new(auth_config.url.clone(), client_id, client_secret, scope, client))
    }

    pub fn basic_auth_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {}", encoded)
    }
}

impl FetchToken for ClientCredentialsSource {
    async fn fetch_token(&self) -> GatewayResult<TokenResponse> {
        debug!(url = %self.url, scope = %self.scope, "requesting access token");

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, self.basic_auth_header())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(&[("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS), ("scope", self.scope.as_str())])
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "token request failed");
                GatewayError::AuthenticationFailed(format!("token request failed: {}", err))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "token endpoint rejected the exchange");
            return Err(GatewayError::AuthenticationFailed(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body = response.text().await.map_err(|err| {
            GatewayError::AuthenticationFailed(format!("token response unreadable: {}", err))
        })?;
        serde_json::from_str::<TokenResponse>(&body).map_err(|err| {
            error!(error = %err, "token response is malformed");
            GatewayError::AuthenticationFailed(format!("malformed token response: {}", err))
        })
    }
}
