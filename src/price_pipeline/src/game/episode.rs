//! Historical episodes and difficulty levels.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GameError;

/// A fixed historical window to trade through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    /// Stable identifier, e.g. `covid_crash_2020`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// First trading day, `YYYY-MM-DD`.
    pub start: &'static str,
    /// Last trading day, `YYYY-MM-DD`.
    pub end: &'static str,
    /// One-line blurb.
    pub description: &'static str,
}

/// All playable episodes.
pub static EPISODES: [Episode; 4] = [
    Episode {
        id: "covid_crash_2020",
        name: "COVID-19 Market Crash 2020",
        start: "2020-02-19",
        end: "2020-04-07",
        description: "The pandemic crash and the first leg of the recovery",
    },
    Episode {
        id: "dotcom_bubble_2000",
        name: "Dot-com Bubble Burst 2000",
        start: "2000-03-10",
        end: "2000-10-09",
        description: "The collapse of the dot-com bubble",
    },
    Episode {
        id: "financial_crisis_2008",
        name: "Financial Crisis 2008",
        start: "2008-09-15",
        end: "2009-03-09",
        description: "From the Lehman bankruptcy to the March 2009 low",
    },
    Episode {
        id: "tech_boom_2021",
        name: "Tech Boom 2021",
        start: "2021-01-01",
        end: "2021-12-31",
        description: "A full year of the 2021 tech rally",
    },
];

impl Episode {
    /// Look up an episode by id.
    pub fn find(id: &str) -> Result<&'static Episode, GameError> {
        EPISODES
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| GameError::UnknownEpisode(id.to_string()))
    }

    /// Parsed start date.
    pub fn start_date(&self) -> Result<NaiveDate, GameError> {
        parse_day(self.start)
    }

    /// Parsed end date.
    pub fn end_date(&self) -> Result<NaiveDate, GameError> {
        parse_day(self.end)
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, GameError> {
    s.parse()
        .map_err(|_| GameError::InvalidDate(s.to_string()))
}

/// Starting conditions for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 100k cash, 0.1% fees.
    Easy,
    /// 50k cash, 0.2% fees.
    Medium,
    /// 25k cash, 0.5% fees.
    Hard,
}

/// Numbers behind a [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultySettings {
    /// Initial cash balance.
    pub starting_cash: f64,
    /// Fee charged on every fill, as a fraction of notional.
    pub fee_rate: f64,
    /// Buying power multiplier. Reported only; fills never use margin.
    pub margin_multiplier: f64,
}

impl Difficulty {
    /// Every level, easiest first.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// The numbers for this level.
    pub fn settings(self) -> DifficultySettings {
        let (starting_cash, fee_rate, margin_multiplier) = match self {
            Self::Easy => (100_000.0, 0.001, 1.0),
            Self::Medium => (50_000.0, 0.002, 1.5),
            Self::Hard => (25_000.0, 0.005, 2.0),
        };
        DifficultySettings {
            starting_cash,
            fee_rate,
            margin_multiplier,
        }
    }

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}
