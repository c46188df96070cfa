use std::{fs, path::Path};
use crate::config::settings::{LogFormat, LoggingConfig};
use crate::config::sources::ServiceConfig;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{DEFAULT_AUTH_SCOPE, DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_TRANSLATIONS};
use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};
use crate::config::proc_validator;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config '{}': {}", path.display(), e))?;

    let expanded = expand_env_vars(&content)?;
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
        })?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::new("info".to_owned(), LogFormat::Compact));
    }
    if service_config.settings.safety_margin_seconds.is_none() {
        service_config.settings.safety_margin_seconds = Some(DEFAULT_SAFETY_MARGIN_SECS);
    }
    if service_config.auth.scope.is_none() {
        service_config.auth.scope = Some(DEFAULT_AUTH_SCOPE.to_owned());
    }
    if service_config.content.translations.is_none() {
        service_config.content.translations = Some(DEFAULT_TRANSLATIONS.to_owned());
    }
    service_config.content.base_url = service_config.content.base_url.trim_end_matches('/').to_owned();

    debug!("validation config ...");
    if let Err(errors) = proc_validator::validate_service_config(&service_config) {
        metrics.config_validation_errors.inc_by(errors.len() as u64);
        for err in &errors {
            error!("config validation: {}", err);
        }
        return Err(anyhow!("config is invalid: {}", errors.join("; ")));
    }

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with the environment value.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}")?;
    Ok(re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string())
}
