//! Cash plus average-cost holdings.

use indexmap::IndexMap;
use serde::Serialize;

use super::GameError;

/// One open position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    /// Shares held, always positive.
    pub shares: u64,
    /// Average cost per share across all buys.
    pub avg_price: f64,
    /// Last known market price.
    pub current_price: f64,
}

impl Holding {
    /// Market value at the last known price.
    pub fn value(&self) -> f64 {
        self.shares as f64 * self.current_price
    }

    /// Unrealized gain at the last known price.
    pub fn pnl(&self) -> f64 {
        (self.current_price - self.avg_price) * self.shares as f64
    }
}

/// Cash and positions of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    /// Uninvested cash.
    pub cash: f64,
    /// Open positions keyed by symbol, in the order they were opened.
    pub holdings: IndexMap<String, Holding>,
}

impl Portfolio {
    /// All cash, no positions.
    pub fn with_cash(cash: f64) -> Self {
        Self {
            cash,
            holdings: IndexMap::new(),
        }
    }

    /// Cash plus the market value of every holding.
    pub fn equity(&self) -> f64 {
        self.cash + self.holdings.values().map(Holding::value).sum::<f64>()
    }

    /// Sum of unrealized gains.
    pub fn unrealized_pnl(&self) -> f64 {
        self.holdings.values().map(Holding::pnl).sum()
    }

    /// Debit `qty * price + fees` and fold the shares into the average cost.
    pub fn buy(&mut self, symbol: &str, qty: u64, price: f64, fees: f64) -> Result<(), GameError> {
        let cost = price * qty as f64;
        let needed = cost + fees;
        if self.cash < needed {
            return Err(GameError::InsufficientCash {
                needed,
                available: self.cash,
            });
        }
        self.cash -= needed;

        let holding = self.holdings.entry(symbol.to_string()).or_insert(Holding {
            shares: 0,
            avg_price: price,
            current_price: price,
        });
        let total = holding.shares + qty;
        holding.avg_price = (holding.avg_price * holding.shares as f64 + cost) / total as f64;
        holding.shares = total;
        holding.current_price = price;
        Ok(())
    }

    /// Credit `qty * price - fees`; a position sold down to zero is closed.
    pub fn sell(&mut self, symbol: &str, qty: u64, price: f64, fees: f64) -> Result<(), GameError> {
        let held = self.holdings.get(symbol).map_or(0, |h| h.shares);
        if held < qty {
            return Err(GameError::InsufficientShares {
                symbol: symbol.to_string(),
                held,
                requested: qty,
            });
        }
        self.cash += price * qty as f64 - fees;

        if held == qty {
            self.holdings.shift_remove(symbol);
        } else if let Some(holding) = self.holdings.get_mut(symbol) {
            holding.shares -= qty;
            holding.current_price = price;
        }
        Ok(())
    }

    /// Set the market price of a held symbol. Unknown symbols are ignored.
    pub fn reprice(&mut self, symbol: &str, price: f64) {
        if let Some(holding) = self.holdings.get_mut(symbol) {
            holding.current_price = price;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_cost_and_close_out() {
        let mut p = Portfolio::with_cash(10_000.0);
        p.buy("AAPL", 10, 100.0, 1.0).unwrap();
        p.buy("AAPL", 10, 200.0, 2.0).unwrap();
        assert_eq!(p.cash, 10_000.0 - 1_000.0 - 1.0 - 2_000.0 - 2.0);
        let h = &p.holdings["AAPL"];
        assert_eq!(h.shares, 20);
        assert_eq!(h.avg_price, 150.0);

        p.reprice("AAPL", 160.0);
        assert_eq!(p.unrealized_pnl(), 200.0);
        assert_eq!(p.equity(), p.cash + 3_200.0);

        p.sell("AAPL", 20, 160.0, 3.2).unwrap();
        assert!(p.holdings.is_empty());
    }

    #[test]
    fn rejects_overdraft_and_oversell() {
        let mut p = Portfolio::with_cash(1_000.0);
        assert!(matches!(
            p.buy("MSFT", 10, 100.0, 0.5),
            Err(GameError::InsufficientCash { .. })
        ));
        assert_eq!(p.cash, 1_000.0);
        assert!(matches!(
            p.sell("MSFT", 1, 100.0, 0.0),
            Err(GameError::InsufficientShares { held: 0, .. })
        ));
    }
}
