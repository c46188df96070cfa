use std::{env, fs};

use anyhow::{anyhow, Result};

use crate::config::sources::GenericSourceValue;

/// Resolve a configured credential to its literal value.
pub fn prepare_generic_source_value(value: &GenericSourceValue) -> Result<String> {
    match value {
        GenericSourceValue::Literal { value } => Ok(value.to_owned()),
        GenericSourceValue::FromEnv { from_env } => env::var(from_env)
            .map_err(|err| anyhow!("env variable '{}' is not available: {}", from_env, err)),
        GenericSourceValue::FromFile { path } => fs::read_to_string(path)
            .map_err(|err| anyhow!("file '{}' is not readable: {}", path, err))
            .map(|res| res.trim().to_string()),
    }
}
