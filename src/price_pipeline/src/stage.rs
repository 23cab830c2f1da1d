//! Bulk load of one symbol's feature rows into `processed_stage`.

use diesel::prelude::*;
use tracing::debug;

use crate::{db::StoreResult, features::FeatureRow, models::StageRecord, schema::processed_stage};

/// Rows per multi-row INSERT. 26 bound parameters per row keeps a full chunk well
/// under SQLite's default limit of 32766 variables.
pub const STAGE_CHUNK_ROWS: usize = 500;

/// Append every row as a staging record for `symbol`, in one transaction.
///
/// Returns the number of rows written. An empty slice touches nothing. Statement
/// failures roll the whole call back and are returned as-is.
pub fn load_stage(
    conn: &mut SqliteConnection,
    symbol: &str,
    rows: &[FeatureRow],
) -> StoreResult<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let records: Vec<StageRecord> = rows
        .iter()
        .map(|row| StageRecord::from_feature(symbol, row))
        .collect();

    let staged = conn.immediate_transaction(|conn| {
        let mut written = 0;
        for chunk in records.chunks(STAGE_CHUNK_ROWS) {
            written += diesel::insert_into(processed_stage::table)
                .values(chunk)
                .execute(conn)?;
        }
        Ok::<_, diesel::result::Error>(written)
    })?;

    debug!(symbol, rows = staged, "staged feature rows");
    Ok(staged)
}

/// Rows currently waiting in `processed_stage`.
pub fn count_staged(conn: &mut SqliteConnection) -> StoreResult<i64> {
    Ok(processed_stage::table.count().get_result(conn)?)
}
