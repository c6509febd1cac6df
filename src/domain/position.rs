//! Position tracking: held quantity and average entry price.

use serde::{Deserialize, Serialize};

/// The single long position a session can hold. Quantity is fractional
/// (Bitcoin units) and never negative; mutated only by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub quantity: f64,
    pub avg_entry_price: f64,
}

impl Position {
    pub fn new() -> Self {
        Position {
            quantity: 0.0,
            avg_entry_price: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity * (price - self.avg_entry_price)
    }

    /// Add to the position, rolling the average entry price.
    pub fn add(&mut self, quantity: f64, price: f64) {
        if quantity <= 0.0 {
            return;
        }
        let total = self.quantity + quantity;
        self.avg_entry_price =
            (self.avg_entry_price * self.quantity + price * quantity) / total;
        self.quantity = total;
    }

    /// Remove up to the held quantity. The entry price is kept for the
    /// remainder and cleared when the position closes fully.
    pub fn reduce(&mut self, quantity: f64) {
        self.quantity = (self.quantity - quantity).max(0.0);
        if self.quantity == 0.0 {
            self.avg_entry_price = 0.0;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
