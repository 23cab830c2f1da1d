use std::str::FromStr;

use thiserror::Error;

use crate::config::ConfigError;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// A variable that is set to an empty (or all-whitespace) string counts as missing,
/// so `.env` templates with blank placeholders fail the same way as unset ones.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    get_env_var_opt(name).ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Reads an optional environment variable. Unset and blank both map to `None`.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Reads and parses an optional environment variable, falling back to `default` when unset.
pub fn get_env_var_parsed<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_var_opt(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name: name.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
