use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::token_cache::TokenCache;
use crate::content::client::ContentClient;
use crate::content::endpoint::ContentEndpoint;
use crate::error::{GatewayError, GatewayResult};
use crate::sources::FetchToken;

/// Content operations exposed by the gateway: token from the shared cache,
/// one upstream GET, body passed through.
#[derive(Debug)]
pub struct QuranContentService<S> {
    tokens: Arc<TokenCache<S>>,
    client: ContentClient,
}

impl<S: FetchToken> QuranContentService<S> {
    pub fn new(tokens: Arc<TokenCache<S>>, client: ContentClient) -> Self {
        Self { tokens, client }
    }

    pub fn tokens(&self) -> &Arc<TokenCache<S>> {
        &self.tokens
    }

    pub async fn list_reciters(&self) -> GatewayResult<Value> {
        self.fetch(ContentEndpoint::Recitations).await
    }

    pub async fn list_tafsirs(&self) -> GatewayResult<Value> {
        self.fetch(ContentEndpoint::Tafsirs).await
    }

    pub async fn list_surahs(&self) -> GatewayResult<Value> {
        self.fetch(ContentEndpoint::Chapters).await
    }

    pub async fn get_surah(&self, surah_id: u32) -> GatewayResult<Value> {
        self.fetch(ContentEndpoint::Chapter { surah_id }).await
    }

    pub async fn get_surah_info(&self, surah_id: u32) -> GatewayResult<Value> {
        self.fetch(ContentEndpoint::ChapterInfo { surah_id }).await
    }

    pub async fn get_verses_of_surah(&self, surah_id: u32, reciter_id: u32) -> GatewayResult<Value> {
        self.fetch(ContentEndpoint::VersesByChapter { surah_id, reciter_id }).await
    }

    pub async fn get_random_ayah_from_surah(
        &self,
        surah_id: u32,
        reciter_id: u32,
        tafsir_id: u32,
    ) -> GatewayResult<Value> {
        self.fetch(ContentEndpoint::RandomVerse { surah_id, reciter_id, tafsir_id }).await
    }

    async fn fetch(&self, endpoint: ContentEndpoint) -> GatewayResult<Value> {
        let token = self.tokens.get_valid_token().await.inspect_err(|err| {
            warn!(endpoint = endpoint.name(), surah_id = ?endpoint.surah_id(), error = %err, "no access token for content request");
        })?;

        match self.client.fetch(&endpoint, &token).await {
            Err(err) if is_unauthorized(&err) => {
                // upstream revoked a token we still consider valid
                info!(endpoint = endpoint.name(), "upstream rejected the cached token");
                if !self.tokens.invalidate(&token).await {
                    if let Some(current) = self.tokens.snapshot().await {
                        debug!(
                            endpoint = endpoint.name(),
                            expires_at = %current.expires_at.to_rfc3339(),
                            "rejected token already replaced"
                        );
                    }
                }
                Err(err)
            }
            other => other,
        }
    }
}

fn is_unauthorized(err: &GatewayError) -> bool {
    matches!(
        err,
        GatewayError::UpstreamFetchFailed { status: Some(status), .. }
            if *status == StatusCode::UNAUTHORIZED.as_u16()
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use httpmock::Method::GET;
    use httpmock::MockServer;

    use super::*;
    use crate::helpers::time::SystemClock;
    use crate::sources::TokenResponse;

    #[derive(Debug, Default)]
    struct SequenceSource {
        calls: AtomicUsize,
    }

    impl FetchToken for SequenceSource {
        async fn fetch_token(&self) -> GatewayResult<TokenResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(TokenResponse { access_token: format!("token-{}", n), expires_in: 3600 })
        }
    }

    fn service_for(server: &MockServer) -> QuranContentService<SequenceSource> {
        let tokens = Arc::new(TokenCache::new(
            SequenceSource::default(),
            Arc::new(SystemClock),
            0,
            Duration::from_secs(5),
        ));
        let client = ContentClient::new(
            server.base_url(),
            "client-id".into(),
            "85".into(),
            Duration::from_secs(5),
            reqwest::Client::new(),
        );
        QuranContentService::new(tokens, client)
    }

    #[tokio::test]
    async fn upstream_401_drops_cached_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/resources/recitations").header("x-auth-token", "token-1");
                then.status(401).body("expired");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/resources/recitations").header("x-auth-token", "token-2");
                then.status(200).json_body(serde_json::json!({ "recitations": [] }));
            })
            .await;

        let service = service_for(&server);

        let err = service.list_reciters().await.unwrap_err();
        assert!(is_unauthorized(&err));
        assert!(service.tokens().snapshot().await.is_none());

        let body = service.list_reciters().await.unwrap();
        assert_eq!(body, serde_json::json!({ "recitations": [] }));
        assert_eq!(service.tokens().source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn late_401_does_not_drop_refreshed_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/resources/recitations").header("x-auth-token", "token-1");
                then.status(401).body("revoked");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/chapters").header("x-auth-token", "token-1");
                then.status(401).body("revoked").delay(Duration::from_millis(400));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/resources/tafsirs").header("x-auth-token", "token-2");
                then.status(200).json_body(serde_json::json!({ "tafsirs": [] }));
            })
            .await;

        let service = Arc::new(service_for(&server));
        assert_eq!(service.tokens().get_valid_token().await.unwrap(), "token-1");

        // slow request still carrying token-1
        let slow = {
            let service = service.clone();
            tokio::spawn(async move { service.list_surahs().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // fast rejection of token-1, then a refresh to token-2
        assert!(service.list_reciters().await.is_err());
        assert!(service.list_tafsirs().await.is_ok());

        let late = slow.await.unwrap().unwrap_err();
        assert!(is_unauthorized(&late));
        assert_eq!(service.tokens().snapshot().await.map(|t| t.value), Some("token-2".to_string()));

        assert!(service.list_tafsirs().await.is_ok());
        assert_eq!(service.tokens().source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_upstream_failures_keep_the_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/chapters");
                then.status(500).body("boom");
            })
            .await;

        let service = service_for(&server);

        let err = service.list_surahs().await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamFetchFailed { status: Some(500), .. }));
        assert_eq!(service.tokens().snapshot().await.map(|t| t.value), Some("token-1".to_string()));
    }
}
