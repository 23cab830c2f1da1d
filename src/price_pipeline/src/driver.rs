//! Discover → read → compute → stage, with chunked merges.

use std::fmt;

use anyhow::Context;
use bar_source::{SourceError, reader::read_raw_bars, store::ObjectStore, symbol::symbol_from_path};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::PipelineOptions,
    features::{FeatureRow, engineer},
    repo::StagingRepo,
};

/// Totals for one pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Objects matched by the listing pattern.
    pub files_discovered: usize,
    /// Files whose rows reached staging.
    pub files_loaded: usize,
    /// Files skipped for a source error or an empty result.
    pub files_skipped: usize,
    /// Feature rows written to staging (the rows upserted by this run).
    pub rows_staged: usize,
    /// Permanent rows inserted or updated across all merges.
    pub rows_merged: usize,
    /// Merge transactions committed, including the final one.
    pub merges: usize,
}

/// Why a file did not reach staging.
#[derive(Debug)]
pub enum SkipReason {
    /// The name does not end in the configured suffix.
    NoSymbol,
    /// Open or normalization failed.
    Source(SourceError),
    /// Nothing left after dropping undated and close-less rows.
    Empty,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSymbol => f.write_str("file name does not carry a symbol"),
            Self::Source(e) => write!(f, "{e}"),
            Self::Empty => f.write_str("no usable rows"),
        }
    }
}

/// Sequential per-file pipeline over one object store and one database.
pub struct PipelineDriver<S, R> {
    store: S,
    repo: R,
    options: PipelineOptions,
}

impl<S: ObjectStore, R: StagingRepo> PipelineDriver<S, R> {
    /// Bind a store, a staging repository, and tunables.
    pub fn new(store: S, repo: R, options: PipelineOptions) -> Self {
        Self {
            store,
            repo,
            options,
        }
    }

    /// Read and engineer one object. Source problems become a [`SkipReason`].
    pub fn prepare(&self, path: &str) -> Result<(String, Vec<FeatureRow>), SkipReason> {
        let symbol =
            symbol_from_path(path, &self.options.raw_suffix).ok_or(SkipReason::NoSymbol)?;
        let bytes = self.store.open(path).map_err(SkipReason::Source)?;
        let bars = read_raw_bars(bytes.as_slice()).map_err(SkipReason::Source)?;
        let rows = engineer(&bars);
        if rows.is_empty() {
            return Err(SkipReason::Empty);
        }
        Ok((symbol, rows))
    }

    /// Process every object matching `pattern`.
    ///
    /// Source errors skip the file. Persistence errors abort the run immediately;
    /// whatever earlier merges committed stays committed and no final merge runs.
    pub fn run(&self, conn: &mut SqliteConnection, pattern: &str) -> anyhow::Result<RunReport> {
        let paths = self
            .store
            .list(pattern)
            .with_context(|| format!("listing {pattern}"))?;
        info!(pattern, files = paths.len(), "discovered raw files");

        let mut report = RunReport {
            files_discovered: paths.len(),
            ..RunReport::default()
        };
        let mut since_merge = 0usize;

        for path in &paths {
            let (symbol, rows) = match self.prepare(path) {
                Ok(prepared) => prepared,
                Err(reason) => {
                    warn!(path = %path, %reason, "skipping raw file");
                    report.files_skipped += 1;
                    continue;
                }
            };

            let staged = self
                .repo
                .load_stage(conn, &symbol, &rows)
                .with_context(|| format!("staging {symbol} from {path}"))?;
            debug!(symbol = %symbol, rows = staged, "file staged");
            report.files_loaded += 1;
            report.rows_staged += staged;
            since_merge += 1;

            if since_merge >= self.options.merge_every.get() {
                self.merge(conn, &mut report)?;
                since_merge = 0;
            }
        }

        self.merge(conn, &mut report)?;
        info!(
            files = report.files_discovered,
            loaded = report.files_loaded,
            skipped = report.files_skipped,
            rows = report.rows_staged,
            "pipeline complete"
        );
        Ok(report)
    }

    fn merge(&self, conn: &mut SqliteConnection, report: &mut RunReport) -> anyhow::Result<()> {
        let merged = self
            .repo
            .merge_stage(conn)
            .context("merging staging into processed_prices")?;
        report.rows_merged += merged;
        report.merges += 1;
        Ok(())
    }
}
