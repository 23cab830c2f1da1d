//! One player's run through an episode.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{
    GameError,
    episode::{Difficulty, DifficultySettings, Episode},
    metrics::Summary,
    portfolio::Portfolio,
    prices::PriceBook,
};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Open or add to a position.
    Buy,
    /// Reduce or close a position.
    Sell,
}

/// How the fill price is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "limit_price")]
pub enum OrderKind {
    /// Fill at the current close.
    Market,
    /// Fill at the limit, only if the current close is on the right side of it.
    Limit(f64),
}

/// A trade instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Symbol to trade.
    pub symbol: String,
    /// Direction.
    pub side: Side,
    /// Whole shares, non-zero.
    pub qty: u64,
    /// Pricing rule.
    pub kind: OrderKind,
}

/// A filled trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Simulated date of the fill.
    pub date: NaiveDate,
    /// Symbol traded.
    pub symbol: String,
    /// Direction.
    pub side: Side,
    /// Shares filled.
    pub qty: u64,
    /// Fill price.
    pub price: f64,
    /// `price * qty`, before fees.
    pub total_cost: f64,
    /// Fees charged.
    pub fees: f64,
}

/// Price move of one held symbol during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceUpdate {
    /// Symbol repriced.
    pub symbol: String,
    /// New price.
    pub price: f64,
    /// Absolute change.
    pub change: f64,
    /// Change in percent of the old price; zero if the old price was not positive.
    pub change_percent: f64,
}

/// Result of [`GameSession::tick`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Date after advancing.
    pub date: NaiveDate,
    /// Holdings that got a new price.
    pub prices: Vec<PriceUpdate>,
    /// Equity after repricing.
    pub equity: f64,
    /// Unrealized gain after repricing.
    pub pnl: f64,
    /// Whether this tick ended the episode.
    pub finished: bool,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting ticks and trades.
    Active,
    /// Past the episode end.
    Finished,
}

/// State of one game.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Registry key.
    pub id: Uuid,
    /// Owner.
    pub user_id: String,
    /// Episode being played.
    pub episode: &'static Episode,
    /// Difficulty chosen at start.
    pub difficulty: Difficulty,
    /// Cash and positions.
    pub portfolio: Portfolio,
    /// Fills, oldest first.
    pub transactions: Vec<Transaction>,
    /// `(date, equity)` after start and after every tick.
    pub equity_curve: Vec<(NaiveDate, f64)>,
    /// Current simulated date.
    pub current_date: NaiveDate,
    /// Lifecycle state.
    pub status: SessionStatus,
    end_date: NaiveDate,
    prices: PriceBook,
}

impl GameSession {
    /// Start a session at the episode's first day with the difficulty's cash.
    pub fn new(
        id: Uuid,
        user_id: impl Into<String>,
        episode: &'static Episode,
        difficulty: Difficulty,
        prices: PriceBook,
    ) -> Result<Self, GameError> {
        let start = episode.start_date()?;
        let cash = difficulty.settings().starting_cash;
        Ok(Self {
            id,
            user_id: user_id.into(),
            episode,
            difficulty,
            portfolio: Portfolio::with_cash(cash),
            transactions: Vec::new(),
            equity_curve: vec![(start, cash)],
            current_date: start,
            status: SessionStatus::Active,
            end_date: episode.end_date()?,
            prices,
        })
    }

    /// Fee schedule and starting cash in effect.
    pub fn settings(&self) -> DifficultySettings {
        self.difficulty.settings()
    }

    /// Prices this session trades against.
    pub fn prices(&self) -> &PriceBook {
        &self.prices
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        match self.status {
            SessionStatus::Active => Ok(()),
            SessionStatus::Finished => Err(GameError::Finished(self.id)),
        }
    }

    /// Advance `speed` calendar days, reprice holdings, and record equity.
    pub fn tick(&mut self, speed: u32) -> Result<TickReport, GameError> {
        self.ensure_active()?;
        if speed == 0 {
            return Err(GameError::InvalidSpeed);
        }

        self.current_date += Duration::days(i64::from(speed));
        let date = self.current_date;

        let quotes: Vec<(String, f64, f64)> = self
            .portfolio
            .holdings
            .iter()
            .filter_map(|(symbol, holding)| {
                let price = self.prices.price_on_or_after(symbol, date)?;
                Some((symbol.clone(), holding.current_price, price))
            })
            .collect();

        let mut updates = Vec::with_capacity(quotes.len());
        for (symbol, old, price) in quotes {
            self.portfolio.reprice(&symbol, price);
            let change = price - old;
            updates.push(PriceUpdate {
                symbol,
                price,
                change,
                change_percent: if old > 0.0 { change / old * 100.0 } else { 0.0 },
            });
        }

        let equity = self.portfolio.equity();
        self.equity_curve.push((date, equity));

        let finished = date > self.end_date;
        if finished {
            self.status = SessionStatus::Finished;
        }
        debug!(game = %self.id, %date, equity, finished, "tick");

        Ok(TickReport {
            date,
            prices: updates,
            equity,
            pnl: self.portfolio.unrealized_pnl(),
            finished,
        })
    }

    /// Fill an order at the current date's price.
    pub fn trade(&mut self, order: &Order) -> Result<Transaction, GameError> {
        self.ensure_active()?;
        if order.qty == 0 {
            return Err(GameError::ZeroQuantity);
        }

        let market = self
            .prices
            .price_on_or_after(&order.symbol, self.current_date)
            .ok_or_else(|| GameError::NoPrice {
                symbol: order.symbol.clone(),
                date: self.current_date,
            })?;

        let price = match order.kind {
            OrderKind::Market => market,
            OrderKind::Limit(limit) => {
                let crosses = match order.side {
                    Side::Buy => market > limit,
                    Side::Sell => market < limit,
                };
                if crosses {
                    return Err(GameError::LimitNotMet {
                        side: order.side,
                        market,
                        limit,
                    });
                }
                limit
            }
        };

        let total_cost = price * order.qty as f64;
        let fees = total_cost * self.settings().fee_rate;
        match order.side {
            Side::Buy => self.portfolio.buy(&order.symbol, order.qty, price, fees)?,
            Side::Sell => self.portfolio.sell(&order.symbol, order.qty, price, fees)?,
        }

        let tx = Transaction {
            date: self.current_date,
            symbol: order.symbol.clone(),
            side: order.side,
            qty: order.qty,
            price,
            total_cost,
            fees,
        };
        debug!(game = %self.id, symbol = %tx.symbol, side = ?tx.side, qty = tx.qty, price, "fill");
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Performance so far.
    pub fn summary(&self) -> Summary {
        let curve: Vec<f64> = self.equity_curve.iter().map(|(_, e)| *e).collect();
        Summary::from_curve(
            self.settings().starting_cash,
            self.portfolio.equity(),
            &curve,
            self.transactions.len(),
        )
    }
}
