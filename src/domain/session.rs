//! Game session: the timed tick loop and its terminal-state machine.
//!
//! One session runs `RUNNING → {WON, TIMED_OUT, LOST, ABORTED}` as a single
//! sequential loop: pull a sample, recompute indicators, decide, gate (live
//! mode), apply to the ledger, then check win, then timeout, then the
//! live-mode drawdown floor. Exactly one [`SessionResult`] comes out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::domain::indicator::{IndicatorBank, IndicatorSnapshot};
use crate::domain::ledger::{ApplyResult, PortfolioLedger, PortfolioState};
use crate::domain::price::PriceSample;
use crate::domain::risk::{Authorization, RiskGate};
use crate::domain::signal::Signal;
use crate::domain::strategy::DecisionPolicy;
use crate::ports::execution_port::ExecutionPort;
use crate::ports::price_feed::PriceFeed;

/// Session parameters, validated before the session is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub starting_balance: f64,
    pub target_percent: f64,
    pub time_limit: Duration,
    pub fee_rate: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            starting_balance: 100.0,
            target_percent: 15.0,
            time_limit: Duration::from_secs(60),
            fee_rate: 0.001,
        }
    }
}

/// Terminal state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    TimedOut,
    Lost,
    Aborted,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Won => "WIN",
            Outcome::TimedOut => "TIMEOUT",
            Outcome::Lost => "LOSS",
            Outcome::Aborted => "ABORTED",
        }
    }
}

/// Everything recorded for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub sample: PriceSample,
    pub snapshot: IndicatorSnapshot,
    pub signal: Signal,
    pub state: PortfolioState,
}

/// Summary statistics over the tick history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub ticks: usize,
    pub trades: usize,
    pub highest_equity: f64,
    pub lowest_equity: f64,
    pub price_low: f64,
    pub price_high: f64,
}

/// The single, immutable record a session emits at termination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub outcome: Outcome,
    pub final_equity: f64,
    pub stats: SessionStats,
    pub ticks: Vec<TickRecord>,
}

/// Drawdown from the starting balance, in percent, floored at zero.
pub fn drawdown_percent(starting_balance: f64, equity: f64) -> f64 {
    ((starting_balance - equity) / starting_balance * 100.0).max(0.0)
}

/// One timed run. Owns its feed, indicator window, ledger and (in live
/// mode) risk gate and execution handle; sessions share no mutable state.
pub struct GameSession {
    config: SessionConfig,
    feed: Box<dyn PriceFeed>,
    bank: IndicatorBank,
    policy: Box<dyn DecisionPolicy>,
    ledger: PortfolioLedger,
    gate: Option<RiskGate>,
    execution: Option<Box<dyn ExecutionPort>>,
    stop: Arc<AtomicBool>,
}

impl GameSession {
    /// Paper session: no risk gate, fills applied directly to the ledger.
    pub fn new(
        config: SessionConfig,
        feed: Box<dyn PriceFeed>,
        bank: IndicatorBank,
        policy: Box<dyn DecisionPolicy>,
    ) -> Self {
        let ledger = PortfolioLedger::new(config.starting_balance, config.fee_rate);
        GameSession {
            config,
            feed,
            bank,
            policy,
            ledger,
            gate: None,
            execution: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Live session: orders pass the risk gate, then the execution
    /// collaborator, before they reach the ledger.
    pub fn with_live_controls(
        mut self,
        gate: RiskGate,
        execution: Box<dyn ExecutionPort>,
    ) -> Self {
        self.gate = Some(gate);
        self.execution = Some(execution);
        self
    }

    /// Handle for cooperative cancellation; observed at tick boundaries.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the session to its terminal state.
    pub fn run(mut self) -> SessionResult {
        let mut ticks: Vec<TickRecord> = Vec::new();
        let mut trades = 0usize;
        let mut session_start: Option<DateTime<Utc>> = None;

        let target_equity =
            self.config.starting_balance * (1.0 + self.config.target_percent / 100.0);
        let loss_floor = self.gate.as_ref().map(|gate| {
            self.config.starting_balance
                * (1.0 - gate.limits().max_daily_drawdown_percent / 100.0)
        });

        info!(
            "session start: balance {:.2}, target {:.1}%, limit {}s",
            self.config.starting_balance,
            self.config.target_percent,
            self.config.time_limit.as_secs(),
        );

        let outcome = loop {
            if self.stop.load(Ordering::Relaxed) {
                info!("stop requested, aborting session");
                break Outcome::Aborted;
            }

            let sample = match self.feed.next() {
                Ok(Some(sample)) => sample,
                Ok(None) => {
                    info!("price feed exhausted, aborting session");
                    break Outcome::Aborted;
                }
                Err(err) => {
                    error!("price feed failed: {err}");
                    break Outcome::Aborted;
                }
            };

            let start = *session_start.get_or_insert(sample.timestamp);
            let snapshot = self.bank.push(&sample);
            let mut signal = self.policy.decide(&snapshot, self.ledger.position());

            if signal.is_trade() {
                signal = self.gate_signal(signal, &sample);
            }
            if signal.is_trade() && self.execution.is_some() {
                signal = self.hand_off(signal, sample.price);
            }

            match self.ledger.apply(&signal, sample.price) {
                ApplyResult::Bought { quantity, fee } => {
                    trades += 1;
                    if let Some(gate) = self.gate.as_mut() {
                        gate.record_trade(sample.timestamp);
                    }
                    info!(
                        "BUY {:.8} BTC at {:.2} (fee {:.4})",
                        quantity, sample.price, fee
                    );
                }
                ApplyResult::Sold { quantity, fee, pnl } => {
                    trades += 1;
                    if let Some(gate) = self.gate.as_mut() {
                        gate.record_trade(sample.timestamp);
                    }
                    info!(
                        "SELL {:.8} BTC at {:.2} (fee {:.4}, pnl {:+.4})",
                        quantity, sample.price, fee, pnl
                    );
                }
                ApplyResult::InsufficientCash => {
                    debug!("buy rejected: insufficient cash");
                }
                ApplyResult::NoPosition => {
                    debug!("sell rejected: no position held");
                }
                ApplyResult::Held => {}
            }

            let state = self.ledger.state(sample.price);
            debug!(
                "tick {}: price {:.2}, equity {:.2} ({:+.2}%)",
                ticks.len(),
                sample.price,
                state.equity,
                (state.equity / self.config.starting_balance - 1.0) * 100.0,
            );

            let equity = state.equity;
            let timestamp = sample.timestamp;
            ticks.push(TickRecord {
                sample,
                snapshot,
                signal,
                state,
            });

            // Terminal conditions, evaluated in order: win, timeout,
            // live-mode drawdown loss. Feed failure and cancellation are
            // handled at the top of the loop.
            if equity >= target_equity {
                info!("profit target reached: equity {:.2}", equity);
                break Outcome::Won;
            }
            let elapsed = (timestamp - start)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if elapsed >= self.config.time_limit {
                info!("time limit reached after {}s", elapsed.as_secs());
                break Outcome::TimedOut;
            }
            if let Some(floor) = loss_floor {
                if equity <= floor {
                    warn!("drawdown floor breached: equity {:.2}", equity);
                    break Outcome::Lost;
                }
            }
        };

        self.finalize(outcome, ticks, trades, session_start)
    }

    fn gate_signal(&mut self, signal: Signal, sample: &PriceSample) -> Signal {
        let Some(gate) = self.gate.as_mut() else {
            return signal;
        };
        let equity = self.ledger.state(sample.price).equity;
        let drawdown = drawdown_percent(self.config.starting_balance, equity);
        match gate.authorize(&signal, sample.timestamp, drawdown) {
            Authorization::Allowed => signal,
            Authorization::Denied(reason) => {
                warn!("{} denied by risk gate: {reason}", signal.label());
                Signal::Hold
            }
        }
    }

    fn hand_off(&mut self, signal: Signal, price: f64) -> Signal {
        let Some(execution) = self.execution.as_mut() else {
            return signal;
        };
        let Some(order) = self.ledger.order_for(&signal, price) else {
            return signal;
        };
        match execution.execute(&order) {
            Ok(fill) => {
                debug!("fill confirmed: {:.8} at {:.2}", fill.quantity, fill.price);
                signal
            }
            Err(err) => {
                warn!("execution failed, holding: {err}");
                Signal::Hold
            }
        }
    }

    fn finalize(
        self,
        outcome: Outcome,
        ticks: Vec<TickRecord>,
        trades: usize,
        session_start: Option<DateTime<Utc>>,
    ) -> SessionResult {
        let start_time = session_start.unwrap_or_else(Utc::now);
        let end_time = ticks.last().map(|t| t.sample.timestamp).unwrap_or(start_time);
        let final_equity = ticks
            .last()
            .map(|t| t.state.equity)
            .unwrap_or(self.config.starting_balance);

        let mut stats = SessionStats {
            ticks: ticks.len(),
            trades,
            highest_equity: final_equity,
            lowest_equity: final_equity,
            price_low: f64::INFINITY,
            price_high: f64::NEG_INFINITY,
        };
        for tick in &ticks {
            stats.highest_equity = stats.highest_equity.max(tick.state.equity);
            stats.lowest_equity = stats.lowest_equity.min(tick.state.equity);
            stats.price_low = stats.price_low.min(tick.sample.price);
            stats.price_high = stats.price_high.max(tick.sample.price);
        }
        if ticks.is_empty() {
            stats.price_low = 0.0;
            stats.price_high = 0.0;
        }

        info!(
            "session over: {} with equity {:.2} after {} ticks",
            outcome.label(),
            final_equity,
            stats.ticks,
        );

        SessionResult {
            start_time,
            end_time,
            outcome,
            final_equity,
            stats,
            ticks,
        }
    }
}
