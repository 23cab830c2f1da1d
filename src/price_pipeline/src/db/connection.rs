//! SQLite connection helpers.
//!
//! Provides [`connect_sqlite`] that opens a connection and applies the PRAGMAs the
//! pipeline relies on: WAL journaling, foreign_keys=ON, and a 5000ms busy_timeout.
//!
//! Example:
//! ```no_run
//! use price_pipeline::db::connection::connect_sqlite;
//!
//! let path = std::env::temp_dir().join("price_pipeline_example.db");
//! let _conn = connect_sqlite(path.to_str().unwrap()).expect("open sqlite");
//! ```

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};

use super::{StoreResult, sqlite_target};

/// Busy timeout applied to every connection, in milliseconds.
pub const BUSY_TIMEOUT_MS: i32 = 5000;

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> StoreResult<SqliteConnection> {
    let mut conn = SqliteConnection::establish(sqlite_target(database_url)?)?;

    // readers keep going while a merge holds the write lock
    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query(format!("PRAGMA busy_timeout={BUSY_TIMEOUT_MS};")).execute(&mut conn)?;
    Ok(conn)
}
