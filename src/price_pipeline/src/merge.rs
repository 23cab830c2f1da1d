//! Atomic merge of `processed_stage` into `processed_prices`.

use diesel::{prelude::*, sql_query};
use tracing::info;

use crate::{db::StoreResult, schema::processed_stage};

/// Composite key the merge matches on.
pub const KEY_COLUMNS: [&str; 2] = ["symbol", "date"];

/// Columns overwritten when a staged key already exists.
pub const FEATURE_COLUMNS: [&str; 24] = [
    "open",
    "high",
    "low",
    "close",
    "volume",
    "sma_5",
    "sma_10",
    "sma_20",
    "sma_50",
    "sma_200",
    "ema_12",
    "ema_26",
    "macd",
    "macd_signal",
    "macd_hist",
    "bb_middle",
    "bb_upper",
    "bb_lower",
    "returns",
    "log_returns",
    "volatility_20",
    "momentum_20",
    "volume_sma_20",
    "volume_ratio",
];

/// The upsert statement. `WHERE true` is required by SQLite's grammar to tell the
/// upsert clause apart from a join constraint; `ORDER BY rowid` makes repeated
/// keys apply in staging order.
pub fn merge_sql() -> String {
    let columns = KEY_COLUMNS
        .iter()
        .chain(FEATURE_COLUMNS.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let updates = FEATURE_COLUMNS
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO processed_prices ({columns}) \
         SELECT {columns} FROM processed_stage WHERE true ORDER BY rowid \
         ON CONFLICT(symbol, date) DO UPDATE SET {updates}, \
         load_ts = strftime('%Y-%m-%dT%H:%M:%fZ','now')"
    )
}

/// Upsert every staged row and empty the staging table, in one immediate transaction.
///
/// Returns the number of permanent rows inserted or updated. On failure nothing is
/// committed and staging keeps its rows.
pub fn merge_stage(conn: &mut SqliteConnection) -> StoreResult<usize> {
    let statement = merge_sql();
    let (merged, cleared) = conn.immediate_transaction(|conn| {
        let merged = sql_query(statement.as_str()).execute(conn)?;
        let cleared = diesel::delete(processed_stage::table).execute(conn)?;
        Ok::<_, diesel::result::Error>((merged, cleared))
    })?;

    info!(merged, cleared, "merged staging into processed_prices");
    Ok(merged)
}
