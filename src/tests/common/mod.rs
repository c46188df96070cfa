// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;

use crate::config::proc_loader::parse_config;
use crate::helpers::time::Clock;
use crate::ServiceConfig;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Clock that only moves when a test tells it to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Minimal valid config pointing at the given auth and content servers.
pub async fn service_config_for(auth_url: &str, content_base_url: &str) -> ServiceConfig {
    let yaml = format!(
        r#"
settings:
  safety_margin_seconds: 0
  auth_timeout_ms: 2000
  request_timeout_ms: 2000
  server:
    host: 127.0.0.1
    port: "0"
  cors:
    allowed_origins: ["http://localhost:3000"]
  metrics:
    is_enabled: true
    path: /metrics
  logging:
    level: debug
    format: compact
auth:
  url: "{}"
  client_id: {{ value: client-id }}
  client_secret: {{ value: client-secret }}
content:
  base_url: "{}"
"#,
        auth_url, content_base_url
    );
    parse_config(yaml).await.expect("test config must be valid")
}
