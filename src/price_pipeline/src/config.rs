//! Runtime configuration.
//!
//! Two layers:
//! - [`Settings`]: storage and database identity, all required, read from the environment.
//! - [`PipelineOptions`]: tunables with defaults, read from an optional TOML file and
//!   overridable by `MERGE_EVERY` (and by the CLI on top of that).

use std::{fs, num::NonZeroUsize, path::{Path, PathBuf}};

use bar_source::{store::local::LocalFsStore, symbol::RAW_SUFFIX};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use shared_utils::{
    config::ConfigError,
    env::{get_env_var, get_env_var_parsed},
};

/// Storage account identifier.
pub const ENV_STORAGE_ACCOUNT: &str = "STORAGE_ACCOUNT";
/// Storage account key.
pub const ENV_STORAGE_KEY: &str = "STORAGE_KEY";
/// Container holding the raw objects.
pub const ENV_STORAGE_CONTAINER: &str = "STORAGE_CONTAINER";
/// Prefix of raw objects inside the container.
pub const ENV_STORAGE_RAW_PREFIX: &str = "STORAGE_RAW_PREFIX";
/// Local directory that stands in for the storage endpoint.
pub const ENV_STORAGE_ROOT: &str = "STORAGE_ROOT";
/// SQLite database path or `sqlite:` URL.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Optional override of [`PipelineOptions::merge_every`].
pub const ENV_MERGE_EVERY: &str = "MERGE_EVERY";

/// Files staged between merges when nothing overrides it.
pub const DEFAULT_MERGE_EVERY: usize = 40;

/// Required connection settings.
#[derive(Debug)]
pub struct Settings {
    /// Storage account name; the store root is `<storage_root>/<account>`.
    pub storage_account: String,
    /// Storage credential. Never logged.
    pub storage_key: SecretString,
    /// Container name.
    pub storage_container: String,
    /// Raw object prefix inside the container.
    pub storage_raw_prefix: String,
    /// Base directory of the local store.
    pub storage_root: PathBuf,
    /// Database location.
    pub database_url: String,
}

impl Settings {
    /// Read every required variable, failing on the first absent one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            storage_account: get_env_var(ENV_STORAGE_ACCOUNT)?,
            storage_key: SecretString::from(get_env_var(ENV_STORAGE_KEY)?),
            storage_container: get_env_var(ENV_STORAGE_CONTAINER)?,
            storage_raw_prefix: get_env_var(ENV_STORAGE_RAW_PREFIX)?,
            storage_root: PathBuf::from(get_env_var(ENV_STORAGE_ROOT)?),
            database_url: database_url_from_env()?,
        })
    }

    /// `<container>/<raw_prefix>/*.csv`, without doubled separators.
    pub fn raw_pattern(&self) -> String {
        let container = self.storage_container.trim_matches('/');
        let prefix = self.storage_raw_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{container}/*.csv")
        } else {
            format!("{container}/{prefix}/*.csv")
        }
    }

    /// The object store these settings point at.
    pub fn open_store(&self) -> LocalFsStore {
        LocalFsStore::for_account(&self.storage_root, &self.storage_account)
    }
}

/// `DATABASE_URL` alone, for commands that never touch storage.
pub fn database_url_from_env() -> Result<String, ConfigError> {
    Ok(get_env_var(ENV_DATABASE_URL)?)
}

/// Pipeline tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PipelineOptions {
    /// Merge after this many files have been staged.
    pub merge_every: NonZeroUsize,
    /// Suffix stripped from raw object names to get the symbol.
    pub raw_suffix: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            merge_every: NonZeroUsize::new(DEFAULT_MERGE_EVERY).unwrap_or(NonZeroUsize::MIN),
            raw_suffix: RAW_SUFFIX.to_string(),
        }
    }
}

impl PipelineOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::File {
            path: origin.to_string(),
            reason: e.message().to_string(),
        })
    }

    /// Read options from `path` when given, else defaults; then apply `MERGE_EVERY`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => {
                let origin = p.display().to_string();
                let text = fs::read_to_string(p).map_err(|e| ConfigError::File {
                    path: origin.clone(),
                    reason: e.to_string(),
                })?;
                Self::from_toml_str(&text, &origin)?
            }
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Apply environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.merge_every = get_env_var_parsed(ENV_MERGE_EVERY, self.merge_every)?;
        Ok(self)
    }
}
