use thiserror::Error;

use crate::env::MissingEnvVarError;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is not present.
    #[error("Missing environment variable: {0}")]
    Missing(String),

    /// A setting is present but its value cannot be used.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Name of the offending setting.
        name: String,
        /// The raw value that failed to parse.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("Config file {path}: {reason}")]
    File {
        /// Path of the file as given.
        path: String,
        /// Reader or parser message.
        reason: String,
    },
}

impl From<MissingEnvVarError> for ConfigError {
    fn from(err: MissingEnvVarError) -> Self {
        Self::Missing(err.0)
    }
}
