//! Port traits the domain depends on and the adapters implement.

pub mod config_port;
pub mod execution_port;
pub mod price_feed;
pub mod report_port;
