#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::VecDeque;

use tradegame::domain::error::GameError;
use tradegame::domain::indicator::IndicatorSnapshot;
use tradegame::domain::position::Position;
use tradegame::domain::price::PriceSample;
use tradegame::domain::session::SessionConfig;
use tradegame::domain::signal::Signal;
use tradegame::domain::strategy::DecisionPolicy;
use tradegame::ports::price_feed::PriceFeed;

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Feed that replays a fixed script of (timestamp, price) samples.
pub struct ScriptFeed {
    samples: Vec<PriceSample>,
    index: usize,
}

impl ScriptFeed {
    /// One-second cadence starting at t=0.
    pub fn from_prices(prices: &[f64]) -> Self {
        let samples = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PriceSample {
                timestamp: ts(i as i64),
                price,
            })
            .collect();
        ScriptFeed { samples, index: 0 }
    }

    pub fn from_pairs(pairs: &[(i64, f64)]) -> Self {
        let samples = pairs
            .iter()
            .map(|&(secs, price)| PriceSample {
                timestamp: ts(secs),
                price,
            })
            .collect();
        ScriptFeed { samples, index: 0 }
    }
}

impl PriceFeed for ScriptFeed {
    fn next(&mut self) -> Result<Option<PriceSample>, GameError> {
        match self.samples.get(self.index) {
            Some(sample) => {
                self.index += 1;
                Ok(Some(sample.clone()))
            }
            None => Ok(None),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.samples.len()
    }
}

/// Policy that emits a scripted signal sequence, then holds.
pub struct ScriptedPolicy {
    signals: RefCell<VecDeque<Signal>>,
}

impl ScriptedPolicy {
    pub fn new(signals: Vec<Signal>) -> Self {
        ScriptedPolicy {
            signals: RefCell::new(signals.into()),
        }
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide(&self, _snapshot: &IndicatorSnapshot, _position: &Position) -> Signal {
        self.signals
            .borrow_mut()
            .pop_front()
            .unwrap_or(Signal::Hold)
    }
}

/// Policy that buys 95% of cash on every tick.
pub struct AlwaysBuy;

impl DecisionPolicy for AlwaysBuy {
    fn decide(&self, _snapshot: &IndicatorSnapshot, _position: &Position) -> Signal {
        Signal::Buy { size: 0.95 }
    }
}

pub fn session_config(target_percent: f64, time_limit_secs: u64) -> SessionConfig {
    SessionConfig {
        starting_balance: 100.0,
        target_percent,
        time_limit: std::time::Duration::from_secs(time_limit_secs),
        fee_rate: 0.0,
    }
}
