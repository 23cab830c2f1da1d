//! Close prices for the symbols of one episode.

use chrono::NaiveDate;
use diesel::SqliteConnection;
use indexmap::IndexMap;

use super::{GameError, episode::Episode};
use crate::repo::load_closes;

/// Per-symbol ascending `(date, close)` series.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    series: IndexMap<String, Vec<(NaiveDate, f64)>>,
}

impl PriceBook {
    /// Build from `(symbol, date, close)` rows in any order.
    pub fn from_rows(rows: impl IntoIterator<Item = (String, NaiveDate, f64)>) -> Self {
        let mut series: IndexMap<String, Vec<(NaiveDate, f64)>> = IndexMap::new();
        for (symbol, date, close) in rows {
            series.entry(symbol).or_default().push((date, close));
        }
        for points in series.values_mut() {
            points.sort_by_key(|(d, _)| *d);
            points.dedup_by_key(|(d, _)| *d);
        }
        Self { series }
    }

    /// Every persisted close inside the episode window.
    pub fn load(conn: &mut SqliteConnection, episode: &Episode) -> Result<Self, GameError> {
        let rows = load_closes(conn, episode.start_date()?, episode.end_date()?)?;
        Ok(Self::from_rows(rows))
    }

    /// Symbols with at least one price, in first-seen order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Close on `date`, else on the next date that has one.
    pub fn price_on_or_after(&self, symbol: &str, date: NaiveDate) -> Option<f64> {
        let points = self.series.get(symbol)?;
        let idx = points.partition_point(|(d, _)| *d < date);
        points.get(idx).map(|(_, close)| *close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
    }

    #[test]
    fn exact_then_forward() {
        let book = PriceBook::from_rows(vec![
            ("SPY".to_string(), d(6), 297.0),
            ("SPY".to_string(), d(2), 309.0),
            ("SPY".to_string(), d(3), 300.0),
        ]);
        assert_eq!(book.price_on_or_after("SPY", d(3)), Some(300.0));
        // weekend rolls to Monday
        assert_eq!(book.price_on_or_after("SPY", d(4)), Some(297.0));
        assert_eq!(book.price_on_or_after("SPY", d(1)), Some(309.0));
        assert_eq!(book.price_on_or_after("SPY", d(9)), None);
        assert_eq!(book.price_on_or_after("QQQ", d(3)), None);
    }
}
