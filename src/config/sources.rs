use serde::Deserialize;

use crate::config::settings::SettingsConfig;


/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub auth: AuthConfig,
    pub content: ContentConfig,
}

/// ================================
/// Token endpoint (client credentials)
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub url: String,
    pub client_id: GenericSourceValue,
    pub client_secret: GenericSourceValue,
    /// defaults to `content`
    pub scope: Option<String>,
}

/// Credential value sources
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum GenericSourceValue {
    Literal {
        value: String,
    },
    FromEnv {
        from_env: String,
    },
    FromFile {
        path: String,
    },
}

/// ================================
/// Upstream content API
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub base_url: String,
    /// translation resource id requested with verses
    pub translations: Option<String>,
}
