//! Paper portfolio: cash balance plus per-ticker positions.

use std::collections::HashMap;

use anyhow::{bail, Result};

pub const STARTING_BALANCE: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holding {
    pub qty: f64,
    pub avg_price: f64,
}

impl Holding {
    pub fn market_value(&self, price: f64) -> f64 {
        self.qty * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.market_value(price) - self.qty * self.avg_price
    }
}

#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    pub balance: f64,
    pub holdings: HashMap<String, Holding>,
}

impl Portfolio {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            holdings: HashMap::new(),
        }
    }

    pub fn position(&self, ticker: &str) -> Option<&Holding> {
        self.holdings.get(ticker)
    }

    /// Debit cash and fold the fill into the volume-weighted average price.
    pub fn buy(&mut self, ticker: &str, qty: f64, price: f64) -> Result<()> {
        if !(qty > 0.0) {
            bail!("Invalid quantity");
        }
        let cost = qty * price;
        if cost > self.balance {
            bail!("Insufficient funds!");
        }

        self.balance -= cost;
        let holding = self.holdings.entry(ticker.to_string()).or_insert(Holding {
            qty: 0.0,
            avg_price: 0.0,
        });
        let total_cost = holding.qty * holding.avg_price + cost;
        holding.qty += qty;
        holding.avg_price = total_cost / holding.qty;
        Ok(())
    }

    /// Credit cash; the position is dropped once fully closed. The average
    /// price of what remains is unchanged by a sale.
    pub fn sell(&mut self, ticker: &str, qty: f64, price: f64) -> Result<()> {
        if !(qty > 0.0) {
            bail!("Invalid quantity");
        }
        let Some(holding) = self.holdings.get_mut(ticker) else {
            bail!("Insufficient shares!");
        };
        if holding.qty < qty {
            bail!("Insufficient shares!");
        }

        self.balance += qty * price;
        holding.qty -= qty;
        if holding.qty <= 0.0 {
            self.holdings.remove(ticker);
        }
        Ok(())
    }

    /// Mark-to-market value of all positions.
    pub fn equity<F>(&self, price_of: F) -> f64
    where
        F: Fn(&str) -> Option<f64>,
    {
        self.holdings
            .iter()
            .map(|(ticker, h)| h.market_value(price_of(ticker).unwrap_or(h.avg_price)))
            .sum()
    }

    pub fn total_value<F>(&self, price_of: F) -> f64
    where
        F: Fn(&str) -> Option<f64>,
    {
        self.balance + self.equity(price_of)
    }
}
