// Single-flight over the real client-credentials source:
//  - token endpoint counts exchanges and answers slowly
//  - many callers hit an empty cache at once
//  - exactly one exchange is observed and everybody gets the same token

#[cfg(test)]
mod test {

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{routing::post, Json, Router};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use http::StatusCode;
    use serde_json::json;
    use tokio::time::sleep;

    use crate::cache::token_cache::TokenCache;
    use crate::error::GatewayError;
    use crate::sources::ClientCredentialsSource;
    use crate::tests::common::{build_reqwest_client, spawn_axum, ManualClock};
    use crate::utils::constants::DEFAULT_AUTH_SCOPE;

    fn source(addr: std::net::SocketAddr) -> ClientCredentialsSource {
        ClientCredentialsSource::new(
            format!("http://{}/oauth2/token", addr),
            "client-id".into(),
            "client-secret".into(),
            DEFAULT_AUTH_SCOPE.into(),
            build_reqwest_client(),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_observe_one_exchange() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let auth_router = Router::new().route("/oauth2/token", post(move || {
            let c = counter_clone.clone();
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                sleep(Duration::from_millis(150)).await;
                Json(json!({ "access_token": format!("token-{}", n), "expires_in": 3600 }))
            }
        }));
        let (auth_h, auth_addr) = spawn_axum(auth_router).await;

        let start = Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let cache = Arc::new(TokenCache::new(source(auth_addr), clock.clone(), 0, Duration::from_secs(5)));

        let (first, second) = tokio::join!(cache.get_valid_token(), cache.get_valid_token());
        assert_eq!(first.unwrap(), "token-1");
        assert_eq!(second.unwrap(), "token-1");
        assert_eq!(counter.load(Ordering::SeqCst), 1, "one outbound auth request expected");

        // the token expires; a burst of callers refreshes it once
        clock.set(start + ChronoDuration::seconds(3600));
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_valid_token().await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "token-2");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        auth_h.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn failed_exchange_is_retried_by_next_caller() {
        // first exchange fails, the second succeeds
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let auth_router = Router::new().route("/oauth2/token", post(move || {
            let c = counter_clone.clone();
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    (StatusCode::INTERNAL_SERVER_ERROR, "transient".to_owned())
                } else {
                    let body = json!({ "access_token": "abc", "expires_in": 3600 }).to_string();
                    (StatusCode::OK, body)
                }
            }
        }));
        let (auth_h, auth_addr) = spawn_axum(auth_router).await;

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TokenCache::new(source(auth_addr), clock, 0, Duration::from_secs(5));

        let err = cache.get_valid_token().await.unwrap_err();
        assert!(matches!(err, GatewayError::AuthenticationFailed(_)));
        assert!(cache.snapshot().await.is_none());

        assert_eq!(cache.get_valid_token().await.unwrap(), "abc");
        assert_eq!(cache.get_valid_token().await.unwrap(), "abc");
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        auth_h.abort();
    }

    #[tokio::test]
    async fn unreachable_token_endpoint_is_authentication_failure() {
        // bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TokenCache::new(source(addr), clock, 0, Duration::from_secs(5));

        let err = cache.get_valid_token().await.unwrap_err();
        assert!(matches!(err, GatewayError::AuthenticationFailed(_)));
    }
}
