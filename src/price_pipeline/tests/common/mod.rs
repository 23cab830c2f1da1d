#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use bar_source::{
    RawBar, SourceError,
    store::{ObjectStore, glob_match},
};
use chrono::NaiveDate;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use price_pipeline::db::{connection, migrate};
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_all(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal"); // WAL is persistent per DB file

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

/// In-memory object store keyed by full object path.
#[derive(Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn with(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(path.to_string(), body.into());
        self
    }
}

impl ObjectStore for MemoryStore {
    fn list(&self, pattern: &str) -> Result<Vec<String>, SourceError> {
        let (dir, glob) = pattern.rsplit_once('/').unwrap_or(("", pattern));
        Ok(self
            .objects
            .keys()
            .filter(|k| {
                let (kd, name) = k.rsplit_once('/').unwrap_or(("", k.as_str()));
                kd == dir && glob_match(glob, name)
            })
            .cloned()
            .collect())
    }

    fn open(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        self.objects.get(path).cloned().ok_or_else(|| SourceError::NotFound {
            path: path.to_string(),
        })
    }
}

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(offset)
}

/// `n` consecutive days of strictly increasing closes starting at `start`.
pub fn rising_bars(n: usize, start: f64, step: f64) -> Vec<RawBar> {
    (0..n)
        .map(|i| RawBar::from_close(day(i as i64), start + step * i as f64, 1_000 + 10 * i as i64))
        .collect()
}

/// Render bars the way the vendor files look.
pub fn raw_csv(bars: &[RawBar]) -> String {
    let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date,
            fmt(b.open),
            fmt(b.high),
            fmt(b.low),
            fmt(b.close),
            b.volume.map(|v| v.to_string()).unwrap_or_default()
        ));
    }
    out
}
