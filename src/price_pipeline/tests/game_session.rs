mod common;
use common::{MemoryStore, raw_csv, setup_db};

use bar_source::RawBar;
use chrono::{Duration, NaiveDate};
use price_pipeline::{
    config::PipelineOptions,
    driver::PipelineDriver,
    game::{
        GameContext, GameError,
        episode::Difficulty,
        prices::PriceBook,
        session::{Order, OrderKind, SessionStatus, Side},
    },
    repo::SqliteRepo,
};

fn covid_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 2, 19).unwrap()
}

/// Daily closes for SPY from the episode start: 300, 301, 302, ...
fn spy_book(days: i64) -> PriceBook {
    PriceBook::from_rows(
        (0..days).map(|i| ("SPY".to_string(), covid_start() + Duration::days(i), 300.0 + i as f64)),
    )
}

fn order(side: Side, qty: u64, kind: OrderKind) -> Order {
    Order {
        symbol: "SPY".to_string(),
        side,
        qty,
        kind,
    }
}

#[test]
fn buy_tick_sell_and_summarize() {
    let mut games = GameContext::new();
    let id = games
        .start("u-1", "covid_crash_2020", Difficulty::Easy, spy_book(60))
        .unwrap();

    let fill = games.trade(id, &order(Side::Buy, 100, OrderKind::Market)).unwrap();
    assert_eq!(fill.price, 300.0);
    assert_eq!(fill.total_cost, 30_000.0);
    assert!((fill.fees - 30.0).abs() < 1e-9);

    let tick = games.tick(id, 5).unwrap();
    assert_eq!(tick.date, covid_start() + Duration::days(5));
    assert_eq!(tick.prices.len(), 1);
    assert_eq!(tick.prices[0].price, 305.0);
    assert!((tick.pnl - 500.0).abs() < 1e-9);
    assert!(!tick.finished);

    games.trade(id, &order(Side::Sell, 100, OrderKind::Market)).unwrap();
    let session = games.get(id).unwrap();
    assert!(session.portfolio.holdings.is_empty());
    // +500 gain, minus 30 + 30.5 in fees
    assert!((session.portfolio.cash - (100_000.0 + 500.0 - 60.5)).abs() < 1e-9);

    let summary = games.finish(id).unwrap();
    assert_eq!(summary.trades_count, 2);
    assert!((summary.return_pct - 0.4395).abs() < 1e-9);
    assert!(games.get(id).is_err());
    assert!(games.is_empty());
}

#[test]
fn limit_orders_fill_at_limit_or_reject() {
    let mut games = GameContext::new();
    let id = games
        .start("u-2", "covid_crash_2020", Difficulty::Medium, spy_book(10))
        .unwrap();

    let fill = games.trade(id, &order(Side::Buy, 10, OrderKind::Limit(310.0))).unwrap();
    assert_eq!(fill.price, 310.0);

    assert!(matches!(
        games.trade(id, &order(Side::Buy, 10, OrderKind::Limit(290.0))),
        Err(GameError::LimitNotMet { side: Side::Buy, .. })
    ));
    assert!(matches!(
        games.trade(id, &order(Side::Sell, 5, OrderKind::Limit(320.0))),
        Err(GameError::LimitNotMet { side: Side::Sell, .. })
    ));
    assert_eq!(games.get(id).unwrap().transactions.len(), 1);
}

#[test]
fn rejects_bad_orders() {
    let mut games = GameContext::new();
    let id = games
        .start("u-3", "covid_crash_2020", Difficulty::Hard, spy_book(10))
        .unwrap();

    assert!(matches!(
        games.trade(id, &order(Side::Buy, 0, OrderKind::Market)),
        Err(GameError::ZeroQuantity)
    ));
    assert!(matches!(
        games.trade(id, &order(Side::Buy, 1_000, OrderKind::Market)),
        Err(GameError::InsufficientCash { .. })
    ));
    assert!(matches!(
        games.trade(id, &order(Side::Sell, 1, OrderKind::Market)),
        Err(GameError::InsufficientShares { .. })
    ));
    let tsla = Order { symbol: "TSLA".into(), ..order(Side::Buy, 1, OrderKind::Market) };
    assert!(matches!(games.trade(id, &tsla), Err(GameError::NoPrice { .. })));
    assert!(matches!(games.tick(id, 0), Err(GameError::InvalidSpeed)));

    assert!(matches!(
        games.start("u-3", "moon_landing", Difficulty::Easy, PriceBook::default()),
        Err(GameError::UnknownEpisode(_))
    ));
    assert!(matches!(
        games.tick(uuid::Uuid::new_v4(), 1),
        Err(GameError::NotFound(_))
    ));
}

#[test]
fn session_finishes_after_episode_end() {
    let mut games = GameContext::new();
    let id = games
        .start("u-4", "covid_crash_2020", Difficulty::Easy, spy_book(60))
        .unwrap();

    // 2020-02-19 .. 2020-04-07 is 48 days
    let t = games.tick(id, 48).unwrap();
    assert!(!t.finished);
    let t = games.tick(id, 1).unwrap();
    assert!(t.finished);

    let session = games.get(id).unwrap();
    assert_eq!(session.status, SessionStatus::Finished);
    assert_eq!(session.equity_curve.len(), 3);
    assert!(matches!(games.tick(id, 1), Err(GameError::Finished(_))));
    assert!(matches!(
        games.trade(id, &order(Side::Buy, 1, OrderKind::Market)),
        Err(GameError::Finished(_))
    ));

    let summary = games.summary(id).unwrap();
    assert_eq!(summary.return_pct, 0.0);
    assert_eq!(summary.max_drawdown, 0.0);
}

#[test]
fn prices_come_from_processed_table() {
    let (_db, mut conn) = setup_db();
    let bars: Vec<RawBar> = (0..40)
        .map(|i| RawBar::from_close(covid_start() + Duration::days(i), 200.0 - i as f64, 5_000))
        .collect();
    let store = MemoryStore::default().with("c/raw/QQQ_raw.csv", raw_csv(&bars));
    PipelineDriver::new(store, SqliteRepo::new(), PipelineOptions::default())
        .run(&mut conn, "c/raw/*.csv")
        .unwrap();

    let mut games = GameContext::new();
    let id = games
        .start_from_db(&mut conn, "u-5", "covid_crash_2020", Difficulty::Easy)
        .unwrap();
    assert_eq!(games.get(id).unwrap().prices().symbols().collect::<Vec<_>>(), ["QQQ"]);

    let qqq = Order { symbol: "QQQ".into(), ..order(Side::Buy, 100, OrderKind::Market) };
    assert_eq!(games.trade(id, &qqq).unwrap().price, 200.0);
    games.tick(id, 10).unwrap();

    let summary = games.summary(id).unwrap();
    assert!(summary.return_pct < 0.0);
    assert!(summary.max_drawdown > 0.0);
}
