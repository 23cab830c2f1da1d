//! Small helpers shared by the ingestion and pipeline crates.
//!
//! - [`env`]: environment variable lookup with structured errors.
//! - [`config`]: the configuration error type used when settings are assembled.
//! - [`cast`]: the null-safe numeric casts applied before values reach a typed sink.

pub mod cast;
pub mod config;
pub mod env;
