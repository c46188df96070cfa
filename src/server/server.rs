use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::Router;
use http::header::{REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use http::{HeaderValue, Method};
use reqwest::Client;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::token_cache::TokenCache;
use crate::config::settings::{CorsConfig, SettingsConfig};
use crate::config::sources::ServiceConfig;
use crate::content::{ContentClient, QuranContentService};
use crate::helpers::time::{get_token_safety_margin_seconds, Clock, SystemClock};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::handlers;
use crate::sources::ClientCredentialsSource;
use crate::utils::constants::{API_PREFIX, DEFAULT_AUTH_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS};

pub type GatewayService = QuranContentService<ClientCredentialsSource>;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub content: Arc<GatewayService>,
}

impl AppState {
    pub fn new(metrics: &Metrics, content: Arc<GatewayService>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            content,
        }
    }
}

/// Wire token source, shared cache and content client from config.
pub fn build_content_service(
    service_config: &ServiceConfig,
    client: Client,
    clock: Arc<dyn Clock>,
) -> Result<GatewayService> {
    let settings = &service_config.settings;
    let source = ClientCredentialsSource::from_config(&service_config.auth, client.clone())
        .context("cannot resolve auth credentials")?;
    let client_id = source.client_id.clone();

    let tokens = Arc::new(TokenCache::new(
        source,
        clock,
        get_token_safety_margin_seconds(settings.safety_margin_seconds),
        Duration::from_millis(settings.auth_timeout_ms.unwrap_or(DEFAULT_AUTH_TIMEOUT_MS)),
    ));
    let content_client = ContentClient::from_config(
        &service_config.content,
        client_id,
        Duration::from_millis(settings.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)),
        client,
    );

    Ok(QuranContentService::new(tokens, content_client))
}

/// Full application router: content routes, metrics and transport layers.
pub fn router(settings_config: &SettingsConfig, state: AppState) -> Result<Router> {
    let mut app = Router::new()
        .nest(API_PREFIX, handlers::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ));

    if let Some(cors) = cors_layer(&settings_config.cors)? {
        app = app.layer(cors);
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

fn cors_layer(cors_config: &CorsConfig) -> Result<Option<CorsLayer>> {
    let origins: Vec<&String> = cors_config
        .allowed_origins
        .iter()
        .filter(|origin| !origin.trim().is_empty())
        .collect();
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins.iter().any(|origin| origin.as_str() == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim_end_matches('/'))
                    .map_err(|e| anyhow!("invalid CORS origin '{}': {}", origin, e))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET]),
    ))
}

/// Start the HTTP server and serve until Ctrl-C / SIGTERM.
pub async fn start(service_config: &ServiceConfig, client: Client) -> Result<()> {
    let metrics = get_metrics().await;
    let content = build_content_service(service_config, client, Arc::new(SystemClock))?;
    let state = AppState::new(metrics, Arc::new(content));
    let app = router(&service_config.settings, state)?;

    let bind_addr = &service_config.settings.server.host;
    let port = &service_config.settings.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port))
        .await
        .with_context(|| format!("cannot bind {}:{}", bind_addr, port))?;
    info!("listening on {}", listener.local_addr()?);
    metrics.up.set(1);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    metrics.up.set(0);
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("cannot listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
