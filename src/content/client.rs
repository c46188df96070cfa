use std::time::Duration;

use http::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::sources::ContentConfig;
use crate::content::endpoint::ContentEndpoint;
use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{DEFAULT_TRANSLATIONS, HEADER_AUTH_TOKEN, HEADER_CLIENT_ID};

static TRANSPORT_MSG: &str = "transport";
static STATUS_MSG: &str = "status";
static BODY_MSG: &str = "body";

/// Issues authenticated GETs against the upstream content API.
#[derive(Debug, Clone)]
pub struct ContentClient {
    base_url: String,
    client_id: String,
    translations: String,
    request_timeout: Duration,
    client: Client,
}

impl ContentClient {
    pub fn new(base_url: String, client_id: String, translations: String, request_timeout: Duration, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client_id,
            translations,
            request_timeout,
            client,
        }
    }

    pub fn from_config(content_config: &ContentConfig, client_id: String, request_timeout: Duration, client: Client) -> Self {
        let translations = content_config
            .translations
            .clone()
            .unwrap_or_else(|| DEFAULT_TRANSLATIONS.to_owned());
        Self::new(content_config.base_url.clone(), client_id, translations, request_timeout, client)
    }

    pub fn url_for(&self, endpoint: &ContentEndpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// GET the endpoint and return the upstream JSON body unchanged.
    pub async fn fetch(&self, endpoint: &ContentEndpoint, token: &str) -> GatewayResult<Value> {
        let metrics = get_metrics().await;
        let name = endpoint.name();
        let start = get_instant();
        metrics.upstream_requests.with_label_values(&[name]).inc();

        let result = self.send(endpoint, token).await;
        metrics.upstream_duration.with_label_values(&[name]).observe(start.elapsed().as_secs_f64());

        result.map_err(|(err, reason)| {
            metrics.upstream_failures.with_label_values(&[name, reason]).inc();
            err
        })
    }

    /// Errors carry the failure reason label.
    async fn send(&self, endpoint: &ContentEndpoint, token: &str) -> Result<Value, (GatewayError, &'static str)> {
        let name = endpoint.name();
        let url = self.url_for(endpoint);
        debug!(endpoint = name, url = %url, "fetching content");

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(HEADER_CLIENT_ID, &self.client_id)
            .header(HEADER_AUTH_TOKEN, token)
            .query(&endpoint.query(&self.translations))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|err| {
                error!(endpoint = name, surah_id = ?endpoint.surah_id(), error = %err, "content request failed");
                (GatewayError::upstream(name, None, format!("request failed: {}", err)), TRANSPORT_MSG)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(endpoint = name, surah_id = ?endpoint.surah_id(), status = %status, "content request rejected");
            return Err((
                GatewayError::upstream(name, Some(status.as_u16()), format!("upstream returned {}", status)),
                STATUS_MSG,
            ));
        }

        response.json::<Value>().await.map_err(|err| {
            error!(endpoint = name, surah_id = ?endpoint.surah_id(), error = %err, "content response is not JSON");
            (GatewayError::upstream(name, None, format!("invalid JSON body: {}", err)), BODY_MSG)
        })
    }
}
