//! Persistence seam used by the pipeline driver.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::{
    db::StoreResult,
    features::FeatureRow,
    merge, stage,
    models::PriceRecord,
    schema::processed_prices,
};

/// Portable surface, SQLite implementation is [`SqliteRepo`].
pub trait StagingRepo {
    /// Append one symbol's rows to staging. Returns rows written.
    fn load_stage(
        &self,
        conn: &mut SqliteConnection,
        symbol: &str,
        rows: &[FeatureRow],
    ) -> StoreResult<usize>;

    /// Merge staging into the permanent table and clear it. Returns rows upserted.
    fn merge_stage(&self, conn: &mut SqliteConnection) -> StoreResult<usize>;

    /// Rows currently staged.
    fn count_staged(&self, conn: &mut SqliteConnection) -> StoreResult<i64>;
}

/// Repository over the `processed_stage` / `processed_prices` tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteRepo;

impl SqliteRepo {
    /// New stateless repository handle.
    pub fn new() -> Self {
        Self
    }
}

impl StagingRepo for SqliteRepo {
    fn load_stage(
        &self,
        conn: &mut SqliteConnection,
        symbol: &str,
        rows: &[FeatureRow],
    ) -> StoreResult<usize> {
        stage::load_stage(conn, symbol, rows)
    }

    fn merge_stage(&self, conn: &mut SqliteConnection) -> StoreResult<usize> {
        merge::merge_stage(conn)
    }

    fn count_staged(&self, conn: &mut SqliteConnection) -> StoreResult<i64> {
        stage::count_staged(conn)
    }
}

/// The persisted series for one symbol, ascending by date.
pub fn load_series(conn: &mut SqliteConnection, symbol: &str) -> StoreResult<Vec<PriceRecord>> {
    use crate::schema::processed_prices::dsl as pp;

    Ok(pp::processed_prices
        .filter(pp::symbol.eq(symbol))
        .order(pp::date.asc())
        .select(PriceRecord::as_select())
        .load(conn)?)
}

/// `(symbol, date, close)` for every persisted row with a close in `[start, end]`,
/// ordered by symbol then date.
pub fn load_closes(
    conn: &mut SqliteConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> StoreResult<Vec<(String, NaiveDate, f64)>> {
    use crate::schema::processed_prices::dsl as pp;

    let rows: Vec<(String, NaiveDate, Option<f64>)> = pp::processed_prices
        .filter(pp::date.ge(start))
        .filter(pp::date.le(end))
        .filter(pp::close.is_not_null())
        .order((pp::symbol.asc(), pp::date.asc()))
        .select((pp::symbol, pp::date, pp::close))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .filter_map(|(symbol, date, close)| Some((symbol, date, close?)))
        .collect())
}

/// Number of rows in `processed_prices`.
pub fn count_persisted(conn: &mut SqliteConnection) -> StoreResult<i64> {
    Ok(processed_prices::table.count().get_result(conn)?)
}
