//! Trading signals produced by the strategy, one per tick.

use serde::{Deserialize, Serialize};

/// A trading decision with a position-size fraction in (0, 1].
///
/// For a buy the size is the fraction of available cash to commit; for a
/// sell it is the fraction of the held quantity to liquidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    Buy { size: f64 },
    Sell { size: f64 },
    Hold,
}

impl Signal {
    pub fn is_trade(&self) -> bool {
        !matches!(self, Signal::Hold)
    }

    pub fn size(&self) -> Option<f64> {
        match self {
            Signal::Buy { size } | Signal::Sell { size } => Some(*size),
            Signal::Hold => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Signal::Buy { .. } => "BUY",
            Signal::Sell { .. } => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}
