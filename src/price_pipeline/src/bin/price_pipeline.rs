use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use price_pipeline::{
    config::{PipelineOptions, Settings, database_url_from_env},
    db::{connection, migrate},
    driver::PipelineDriver,
    repo::SqliteRepo,
};
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Parser)]
#[command(version, about = "Feature pipeline for daily price bars")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply embedded schema migrations to DATABASE_URL.
    Migrate,
    /// Ingest every raw file and merge the features into processed_prices.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// TOML file with pipeline options.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
    /// Merge after this many staged files (overrides MERGE_EVERY and the file).
    #[arg(long, value_name = "N")]
    merge_every: Option<NonZeroUsize>,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Migrate => {
            let applied = migrate::run_all(&database_url_from_env()?)?;
            println!("applied {applied} migration(s)");
        }
        Cmd::Run(args) => {
            let settings = Settings::from_env()?;
            let mut options = PipelineOptions::load(args.options.as_deref())?;
            if let Some(n) = args.merge_every {
                options.merge_every = n;
            }

            migrate::run_all(&settings.database_url)?;
            let mut conn = connection::connect_sqlite(&settings.database_url)
                .with_context(|| format!("opening {}", settings.database_url))?;

            let pattern = settings.raw_pattern();
            let driver = PipelineDriver::new(settings.open_store(), SqliteRepo::new(), options);
            let report = driver.run(&mut conn, &pattern)?;

            println!(
                "Discovered {} files; loaded {}, skipped {}; upserted {} rows in {} merge(s)",
                report.files_discovered,
                report.files_loaded,
                report.files_skipped,
                report.rows_staged,
                report.merges
            );
        }
    }

    Ok(())
}
