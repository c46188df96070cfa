//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * server / metrics / logging settings
//!   * timeouts and safety margin bounds
//!   * auth and content urls
//!   * credential value sources
//!   * CORS origins

use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::sources::{AuthConfig, ContentConfig, GenericSourceValue, ServiceConfig};

const MAX_SAFETY_MARGIN_SECONDS: u64 = 60 * 60 * 24;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_auth(&cfg.auth, &mut errors);
    validate_content(&cfg.content, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({})", errors.len());
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(s) = settings.safety_margin_seconds {
        if s > MAX_SAFETY_MARGIN_SECONDS {
            errors.push(format!(
                "settings.safety_margin_seconds ({}) is unreasonably large",
                s
            ));
        }
    }
    if settings.auth_timeout_ms == Some(0) {
        errors.push("settings.auth_timeout_ms must be greater than 0".to_string());
    }
    if settings.request_timeout_ms == Some(0) {
        errors.push("settings.request_timeout_ms must be greater than 0".to_string());
    }

    if settings.server.host.trim().is_empty() {
        errors.push(format!(
            "settings.server.host '{}' must be valid",
            settings.server.host
        ));
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 0-65535",
            settings.server.port
        ));
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    // empty entries come from unset env vars and are skipped
    for origin in settings.cors.allowed_origins.iter().filter(|o| !o.trim().is_empty()) {
        if origin != "*" && !is_http_url(origin) {
            errors.push(format!(
                "settings.cors.allowed_origins '{}' must be '*' or an http(s) origin",
                origin
            ));
        }
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

fn validate_auth(auth: &AuthConfig, errors: &mut Vec<String>) {
    if !is_http_url(&auth.url) {
        errors.push(format!("auth.url '{}' must be an http(s) url", auth.url));
    }
    validate_generic_source_value("auth.client_id", &auth.client_id, errors);
    validate_generic_source_value("auth.client_secret", &auth.client_secret, errors);
    if let Some(scope) = &auth.scope {
        if scope.trim().is_empty() {
            errors.push("auth.scope cannot be empty".to_string());
        }
    }
}

fn validate_content(content: &ContentConfig, errors: &mut Vec<String>) {
    if !is_http_url(&content.base_url) {
        errors.push(format!(
            "content.base_url '{}' must be an http(s) url",
            content.base_url
        ));
    }
    if let Some(translations) = &content.translations {
        if translations.trim().is_empty() {
            errors.push("content.translations cannot be empty".to_string());
        }
    }
}

fn validate_generic_source_value(path: &str, v: &GenericSourceValue, errors: &mut Vec<String>) {
    match v {
        GenericSourceValue::Literal { value } => {
            if value.trim().is_empty() {
                errors.push(format!("{}: literal value cannot be empty", path));
            }
        }
        GenericSourceValue::FromEnv { from_env } => {
            if from_env.trim().is_empty() {
                errors.push(format!("{}: env name cannot be empty", path));
            }
        }
        GenericSourceValue::FromFile { path: p } => {
            if p.trim().is_empty() {
                errors.push(format!("{}: file path cannot be empty", path));
            }
            // existence is checked when the credential is resolved at startup
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}
