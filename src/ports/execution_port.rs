//! Order execution port trait (live-mode collaborator).

use crate::domain::error::GameError;
use crate::domain::ledger::Order;

/// Confirmation that an order was filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub quantity: f64,
    pub price: f64,
}

/// Hands an authorized order to whatever executes it. The wire protocol
/// behind a real exchange is out of scope here; the session only needs a
/// fill confirmation or a failure reason back.
pub trait ExecutionPort {
    fn execute(&mut self, order: &Order) -> Result<Fill, GameError>;
}
