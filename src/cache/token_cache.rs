use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::token::AccessToken;
use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::{get_instant, Clock};
use crate::observability::metrics::get_metrics;
use crate::sources::FetchToken;

static ERROR_MSG: &str = "error";
static TIMEOUT_MSG: &str = "timeout";

/// Single-slot access-token cache with single-flight refresh.
///
/// Readers take the `current` read lock only. A caller that finds no valid
/// token queues on `refresh_guard`, re-checks the slot once it holds the
/// guard, and only then talks to the token source. The guard remembers the
/// outcome of the last attempt so that callers queued behind a failed
/// attempt share its error instead of issuing their own call.
#[derive(Debug)]
pub struct TokenCache<S> {
    source: S,
    clock: Arc<dyn Clock>,
    safety_margin_seconds: u64,
    refresh_timeout: Duration,
    current: RwLock<Option<AccessToken>>,
    refresh_guard: Mutex<Option<GatewayError>>,
    attempts: AtomicU64,
}

impl<S: FetchToken> TokenCache<S> {
    pub fn new(
        source: S,
        clock: Arc<dyn Clock>,
        safety_margin_seconds: u64,
        refresh_timeout: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            safety_margin_seconds,
            refresh_timeout,
            current: RwLock::new(None),
            refresh_guard: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    /// Token source backing this cache, for inspection.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return a token that is valid now, refreshing it if needed.
    pub async fn get_valid_token(&self) -> GatewayResult<String> {
        if let Some(value) = self.cached_value().await {
            return Ok(value);
        }

        let observed_attempt = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.refresh_guard.lock().await;

        // another caller may have refreshed while we were queued
        if let Some(value) = self.cached_value().await {
            debug!("token refreshed by a concurrent caller");
            return Ok(value);
        }
        if self.attempts.load(Ordering::Acquire) != observed_attempt {
            if let Some(err) = last_failure.as_ref() {
                debug!("sharing failure of the concurrent refresh");
                return Err(err.clone());
            }
        }

        let result = self.refresh().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);
        *last_failure = result.as_ref().err().cloned();
        result
    }

    /// Drop the cached token if it is still the `rejected` one; the next
    /// caller refreshes. A token published after the rejected one was
    /// handed out is kept. Returns whether the slot was cleared.
    pub async fn invalidate(&self, rejected: &str) -> bool {
        let mut current = self.current.write().await;
        match current.as_ref() {
            Some(token) if token.value == rejected => {
                info!(expires_at = %token.expires_at.to_rfc3339(), "cached access token invalidated");
                *current = None;
                true
            }
            _ => false,
        }
    }

    /// Current cached token, valid or not.
    pub async fn snapshot(&self) -> Option<AccessToken> {
        self.current.read().await.clone()
    }

    async fn cached_value(&self) -> Option<String> {
        let now = self.clock.now();
        self.current
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid_at(now, self.safety_margin_seconds))
            .map(|token| token.value.clone())
    }

    async fn refresh(&self) -> GatewayResult<String> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.auth_refresh_requests.inc();
        info!("refreshing access token");

        let fetched = tokio::time::timeout(self.refresh_timeout, self.source.fetch_token()).await;
        metrics
            .auth_refresh_duration
            .observe(start.elapsed().as_secs_f64());

        let response = match fetched {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(error = %err, "access token refresh failed");
                metrics.auth_refresh_failures.with_label_values(&[ERROR_MSG]).inc();
                return Err(err);
            }
            Err(_) => {
                warn!(timeout_ms = self.refresh_timeout.as_millis() as u64, "access token refresh timed out");
                metrics.auth_refresh_failures.with_label_values(&[TIMEOUT_MSG]).inc();
                return Err(GatewayError::AuthenticationFailed(format!(
                    "token request timed out after {:?}",
                    self.refresh_timeout
                )));
            }
        };

        let now = self.clock.now();
        let token = AccessToken::from_expires_in(response.access_token, response.expires_in, now);
        if !token.is_valid_at(now, self.safety_margin_seconds) {
            warn!(
                expires_in = response.expires_in,
                safety_margin_seconds = self.safety_margin_seconds,
                "token lifetime is shorter than the safety margin; it will be refreshed on every call"
            );
        }
        metrics.token_expiry_unix.set(token.expires_at.timestamp());
        info!(expires_at = %token.expires_at.to_rfc3339(), "access token refreshed");

        let value = token.value.clone();
        *self.current.write().await = Some(token);
        Ok(value)
    }
}
