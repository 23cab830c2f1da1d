//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations and runners: [`migrate::run_sqlite`] and [`migrate::run_all`],
//!   which accepts a bare file path or a `sqlite:` / `sqlite://` URL.
//!
//! Example:
//! ```no_run
//! use price_pipeline::db::{migrate, connection};
//!
//! let db_path = std::env::temp_dir().join("price_pipeline_example.db");
//! migrate::run_all(db_path.to_str().unwrap()).expect("migrations");
//!
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;

/// Failures of the persistence layer. Statement errors are carried unmodified.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The connection could not be established.
    #[error("connect: {0}")]
    Connection(#[from] diesel::result::ConnectionError),
    /// A statement or transaction failed.
    #[error("database: {0}")]
    Database(#[from] diesel::result::Error),
    /// Applying the embedded migrations failed.
    #[error("migration: {0}")]
    Migration(String),
    /// `DATABASE_URL` names a backend this build does not speak.
    #[error("unsupported DATABASE_URL: {0}")]
    UnsupportedUrl(String),
}

/// Result alias for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Resolve a `DATABASE_URL` to the path diesel's SQLite backend opens.
pub fn sqlite_target(database_url: &str) -> StoreResult<&str> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        return Err(StoreError::UnsupportedUrl(database_url.to_owned()));
    }
    Ok(database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url))
}
