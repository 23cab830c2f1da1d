//! Embedded schema migrations.

use diesel::{Connection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::{StoreError, StoreResult, sqlite_target};

/// Embedded Diesel migrations bundled with this crate.
///
/// These are applied by `run_sqlite` to bring the database schema up to date.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs pending Diesel migrations on a SQLite database at the given path.
///
/// Sets the journal mode to WAL first and returns the number of migrations applied.
pub fn run_sqlite(path: &str) -> StoreResult<usize> {
    let mut conn = SqliteConnection::establish(path)?;
    conn.batch_execute("PRAGMA journal_mode=WAL;")?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    info!(applied = applied.len(), "migrations complete");
    Ok(applied.len())
}

/// Runs pending migrations for a `DATABASE_URL`.
///
/// Accepts a bare path or a `sqlite:` URL; PostgreSQL URLs are rejected.
pub fn run_all(database_url: &str) -> StoreResult<usize> {
    run_sqlite(sqlite_target(database_url)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn migrations_apply_on_temp_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();

        assert_eq!(run_sqlite(&path).expect("migration run"), 1);
        // second run has nothing left to do
        assert_eq!(run_all(&format!("sqlite:{path}")).expect("rerun"), 0);

        let mut conn = SqliteConnection::establish(&path).unwrap();
        conn.batch_execute(
            "INSERT INTO processed_stage (symbol, date, close) VALUES ('BHP', '2024-01-02', 45.1)",
        )
        .unwrap();
    }
}
