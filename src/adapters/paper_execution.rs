//! Paper execution: confirms every order at its quoted price.
//!
//! Stands in for a real exchange adapter so the live-mode pipeline
//! (risk gate → execution → ledger) can run without touching real funds.

use tracing::info;

use crate::domain::error::GameError;
use crate::domain::ledger::{Order, OrderSide};
use crate::ports::execution_port::{ExecutionPort, Fill};

pub struct PaperExecution;

impl ExecutionPort for PaperExecution {
    fn execute(&mut self, order: &Order) -> Result<Fill, GameError> {
        let side = match order.side {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        };
        info!(
            "PAPER {} {:.8} BTC at {:.2}",
            side, order.quantity, order.price
        );
        Ok(Fill {
            quantity: order.quantity,
            price: order.price,
        })
    }
}
