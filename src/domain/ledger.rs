//! Virtual portfolio ledger: cash and position mutation with fees.

use serde::{Deserialize, Serialize};

use crate::domain::position::Position;
use crate::domain::signal::Signal;

/// Orders below one cent of notional are rejected as insufficient cash.
const MIN_NOTIONAL: f64 = 0.01;

/// Mark-to-market view of the ledger at one price, recomputed each tick.
/// `equity = cash + quantity × price`; fees are realized into cash at trade
/// time and carried in `fees_accrued` as a cumulative counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash: f64,
    pub position: Position,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub fees_accrued: f64,
    pub equity: f64,
}

/// What applying a signal did. Rejections are normal control flow: the
/// signal is simply not realized and the ledger is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyResult {
    Bought { quantity: f64, fee: f64 },
    Sold { quantity: f64, fee: f64, pnl: f64 },
    Held,
    InsufficientCash,
    NoPosition,
}

impl ApplyResult {
    pub fn is_fill(&self) -> bool {
        matches!(self, ApplyResult::Bought { .. } | ApplyResult::Sold { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// An order a signal implies, quoted for the execution collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub side: OrderSide,
    pub quantity: f64,
    pub notional: f64,
    pub price: f64,
}

/// Owns cash and the position; both are mutated only from the owning
/// session's tick loop. Neither can ever go negative: operations that
/// would overdraw are rejected, not clamped.
#[derive(Debug, Clone)]
pub struct PortfolioLedger {
    cash: f64,
    position: Position,
    realized_pnl: f64,
    fees_accrued: f64,
    fee_rate: f64,
}

impl PortfolioLedger {
    pub fn new(starting_balance: f64, fee_rate: f64) -> Self {
        PortfolioLedger {
            cash: starting_balance,
            position: Position::new(),
            realized_pnl: 0.0,
            fees_accrued: 0.0,
            fee_rate,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Quote the order a signal implies at the current price, without
    /// mutating. `None` for holds and for signals the ledger would reject.
    pub fn order_for(&self, signal: &Signal, price: f64) -> Option<Order> {
        match signal {
            Signal::Buy { size } => {
                let notional = self.cash * size;
                if notional < MIN_NOTIONAL {
                    return None;
                }
                let fee = notional * self.fee_rate;
                Some(Order {
                    side: OrderSide::Buy,
                    quantity: (notional - fee) / price,
                    notional,
                    price,
                })
            }
            Signal::Sell { size } => {
                if !self.position.is_open() {
                    return None;
                }
                let quantity = self.position.quantity * size;
                Some(Order {
                    side: OrderSide::Sell,
                    quantity,
                    notional: quantity * price,
                    price,
                })
            }
            Signal::Hold => None,
        }
    }

    /// Apply a signal at the current price. A BUY converts cash into
    /// quantity net of the fee; a SELL liquidates a fraction of the
    /// position and realizes PnL against the average entry price.
    pub fn apply(&mut self, signal: &Signal, price: f64) -> ApplyResult {
        match signal {
            Signal::Buy { size } => {
                let spend = self.cash * size;
                if spend < MIN_NOTIONAL || spend > self.cash {
                    return ApplyResult::InsufficientCash;
                }
                let fee = spend * self.fee_rate;
                let quantity = (spend - fee) / price;

                self.cash -= spend;
                self.position.add(quantity, price);
                self.fees_accrued += fee;

                ApplyResult::Bought { quantity, fee }
            }
            Signal::Sell { size } => {
                if !self.position.is_open() {
                    return ApplyResult::NoPosition;
                }
                let quantity = self.position.quantity * size;
                let proceeds = quantity * price;
                let fee = proceeds * self.fee_rate;
                let pnl = quantity * (price - self.position.avg_entry_price) - fee;

                self.cash += proceeds - fee;
                self.position.reduce(quantity);
                self.realized_pnl += pnl;
                self.fees_accrued += fee;

                ApplyResult::Sold { quantity, fee, pnl }
            }
            Signal::Hold => ApplyResult::Held,
        }
    }

    /// Mark-to-market state at the given price.
    pub fn state(&self, price: f64) -> PortfolioState {
        PortfolioState {
            cash: self.cash,
            position: self.position.clone(),
            realized_pnl: self.realized_pnl,
            unrealized_pnl: self.position.unrealized_pnl(price),
            fees_accrued: self.fees_accrued,
            equity: self.cash + self.position.market_value(price),
        }
    }
}
