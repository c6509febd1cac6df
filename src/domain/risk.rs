//! Live-mode risk gate in front of order execution.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::signal::Signal;

/// Limits a live session must respect. Immutable for the session; the
/// daily counters they govern reset at each UTC day boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    pub trading_enabled: bool,
    pub max_daily_trades: u32,
    pub max_daily_drawdown_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DenialReason {
    TradingDisabled,
    DailyTradeLimit { count: u32, limit: u32 },
    DailyDrawdown { drawdown_percent: f64, limit_percent: f64 },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::TradingDisabled => write!(f, "trading is disabled"),
            DenialReason::DailyTradeLimit { count, limit } => {
                write!(f, "daily trade limit reached ({count}/{limit})")
            }
            DenialReason::DailyDrawdown {
                drawdown_percent,
                limit_percent,
            } => write!(
                f,
                "daily drawdown {drawdown_percent:.2}% at limit {limit_percent:.2}%"
            ),
        }
    }
}

/// A denial degrades the signal to HOLD at the session level; it is a
/// normal control path, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Authorization {
    Allowed,
    Denied(DenialReason),
}

/// Stateful only in its daily counters. The day boundary is observed
/// against sample timestamps at tick time, not by a background timer.
#[derive(Debug, Clone)]
pub struct RiskGate {
    limits: RiskLimits,
    trades_today: u32,
    current_day: Option<NaiveDate>,
}

impl RiskGate {
    pub fn new(limits: RiskLimits) -> Self {
        RiskGate {
            limits,
            trades_today: 0,
            current_day: None,
        }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    pub fn trades_today(&self) -> u32 {
        self.trades_today
    }

    fn roll_day(&mut self, at: DateTime<Utc>) {
        let day = at.date_naive();
        if self.current_day != Some(day) {
            self.current_day = Some(day);
            self.trades_today = 0;
        }
    }

    /// Validate a proposed signal against the limits. HOLD always passes.
    pub fn authorize(
        &mut self,
        signal: &Signal,
        at: DateTime<Utc>,
        drawdown_percent: f64,
    ) -> Authorization {
        self.roll_day(at);

        if !signal.is_trade() {
            return Authorization::Allowed;
        }
        if !self.limits.trading_enabled {
            return Authorization::Denied(DenialReason::TradingDisabled);
        }
        if self.trades_today >= self.limits.max_daily_trades {
            return Authorization::Denied(DenialReason::DailyTradeLimit {
                count: self.trades_today,
                limit: self.limits.max_daily_trades,
            });
        }
        if drawdown_percent >= self.limits.max_daily_drawdown_percent {
            return Authorization::Denied(DenialReason::DailyDrawdown {
                drawdown_percent,
                limit_percent: self.limits.max_daily_drawdown_percent,
            });
        }
        Authorization::Allowed
    }

    /// Count an executed trade against today's budget.
    pub fn record_trade(&mut self, at: DateTime<Utc>) {
        self.roll_day(at);
        self.trades_today += 1;
    }
}
