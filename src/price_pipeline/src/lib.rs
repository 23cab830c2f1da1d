//! Daily bar feature engineering with staged, idempotent upserts.
//!
//! Flow per run: [`driver::PipelineDriver`] lists raw objects, normalizes each into
//! bars, computes the [`features`] panel, appends it to `processed_stage` through
//! [`repo::StagingRepo`], and every few files merges staging into `processed_prices`.
//! The [`game`] module replays persisted closes as a trading simulation.

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod driver;
pub mod features;
pub mod game;
pub mod merge;
pub mod models;
pub mod repo;
pub mod stage;

/// Diesel table definitions for the embedded migrations.
#[allow(missing_docs)]
pub mod schema;
