//! Turn-based trading game over persisted price history.
//!
//! A [`GameContext`] owns every live [`session::GameSession`], keyed by a random
//! [`Uuid`]. Sessions trade against a [`prices::PriceBook`] loaded from
//! `processed_prices` for the chosen [`episode::Episode`].

pub mod episode;
pub mod metrics;
pub mod portfolio;
pub mod prices;
pub mod session;

use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use crate::db::StoreError;
use episode::{Difficulty, Episode};
use metrics::Summary;
use prices::PriceBook;
use session::{GameSession, Order, Side, TickReport, Transaction};

/// Everything a game operation can reject.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// No episode with that id.
    #[error("episode '{0}' not found")]
    UnknownEpisode(String),
    /// Not one of easy / medium / hard.
    #[error("invalid difficulty '{0}', expected easy, medium or hard")]
    UnknownDifficulty(String),
    /// An episode date failed to parse.
    #[error("invalid episode date '{0}'")]
    InvalidDate(String),
    /// No live session with that id.
    #[error("game {0} not found")]
    NotFound(Uuid),
    /// The session is past its episode end.
    #[error("game {0} is finished")]
    Finished(Uuid),
    /// Ticks advance at least one day.
    #[error("tick speed must be at least 1")]
    InvalidSpeed,
    /// Orders need at least one share.
    #[error("quantity must be positive")]
    ZeroQuantity,
    /// Nothing on or after the current date for the symbol.
    #[error("price not available for {symbol} on {date}")]
    NoPrice {
        /// Symbol requested.
        symbol: String,
        /// Current simulated date.
        date: NaiveDate,
    },
    /// The market is on the wrong side of the limit.
    #[error("limit {limit} not reached for {side:?} at market {market}")]
    LimitNotMet {
        /// Order direction.
        side: Side,
        /// Current close.
        market: f64,
        /// Requested limit.
        limit: f64,
    },
    /// Cash does not cover cost plus fees.
    #[error("insufficient cash: need {needed:.2}, have {available:.2}")]
    InsufficientCash {
        /// Cost plus fees.
        needed: f64,
        /// Cash on hand.
        available: f64,
    },
    /// Not enough shares to sell.
    #[error("insufficient shares of {symbol}: hold {held}, asked {requested}")]
    InsufficientShares {
        /// Symbol requested.
        symbol: String,
        /// Shares held.
        held: u64,
        /// Shares asked for.
        requested: u64,
    },
    /// Loading prices failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registry of live sessions. Created once per process and passed to callers.
#[derive(Debug, Default)]
pub struct GameContext {
    sessions: HashMap<Uuid, GameSession>,
}

impl GameContext {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start a session against an already loaded price book.
    pub fn start(
        &mut self,
        user_id: &str,
        episode_id: &str,
        difficulty: Difficulty,
        prices: PriceBook,
    ) -> Result<Uuid, GameError> {
        let episode = Episode::find(episode_id)?;
        let id = Uuid::new_v4();
        let session = GameSession::new(id, user_id, episode, difficulty, prices)?;
        info!(game = %id, user_id, episode = episode.id, %difficulty, "game started");
        self.sessions.insert(id, session);
        Ok(id)
    }

    /// Start a session, loading the episode's prices from the database.
    pub fn start_from_db(
        &mut self,
        conn: &mut SqliteConnection,
        user_id: &str,
        episode_id: &str,
        difficulty: Difficulty,
    ) -> Result<Uuid, GameError> {
        let prices = PriceBook::load(conn, Episode::find(episode_id)?)?;
        self.start(user_id, episode_id, difficulty, prices)
    }

    /// Borrow a live session.
    pub fn get(&self, id: Uuid) -> Result<&GameSession, GameError> {
        self.sessions.get(&id).ok_or(GameError::NotFound(id))
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut GameSession, GameError> {
        self.sessions.get_mut(&id).ok_or(GameError::NotFound(id))
    }

    /// Advance a session.
    pub fn tick(&mut self, id: Uuid, speed: u32) -> Result<TickReport, GameError> {
        self.get_mut(id)?.tick(speed)
    }

    /// Trade in a session.
    pub fn trade(&mut self, id: Uuid, order: &Order) -> Result<Transaction, GameError> {
        self.get_mut(id)?.trade(order)
    }

    /// Performance of a session so far.
    pub fn summary(&self, id: Uuid) -> Result<Summary, GameError> {
        Ok(self.get(id)?.summary())
    }

    /// Remove a session, returning its final summary.
    pub fn finish(&mut self, id: Uuid) -> Result<Summary, GameError> {
        let session = self.sessions.remove(&id).ok_or(GameError::NotFound(id))?;
        let summary = session.summary();
        info!(game = %id, score = summary.score, "game closed");
        Ok(summary)
    }
}
