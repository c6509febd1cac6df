//! End-to-end session tests.
//!
//! Covers the session-level properties: one terminal state and one result
//! per run, seeded determinism of the full tick history, ledger invariants
//! across whole sessions, warmup abstention, and the risk-gate daily
//! counters through a midnight boundary.

mod common;

use common::*;
use std::time::Duration;

use tradegame::adapters::paper_execution::PaperExecution;
use tradegame::adapters::sim_feed::SimulatedFeed;
use tradegame::domain::indicator::{IndicatorBank, IndicatorParams};
use tradegame::domain::risk::{RiskGate, RiskLimits};
use tradegame::domain::session::{GameSession, Outcome, SessionResult};
use tradegame::domain::signal::Signal;
use tradegame::domain::strategy::VotingStrategy;

fn bank() -> IndicatorBank {
    IndicatorBank::new(IndicatorParams::default())
}

fn simulated_session(seed: u64, max_samples: u64, time_limit: u64) -> GameSession {
    let feed = SimulatedFeed::new(
        60_000.0,
        0.002,
        0.0,
        seed,
        ts(0),
        Duration::from_secs(1),
    )
    .with_max_samples(max_samples);

    GameSession::new(
        session_config(15.0, time_limit),
        Box::new(feed),
        bank(),
        Box::new(VotingStrategy::standard(0.95, 1.0)),
    )
}

mod terminal_behavior {
    use super::*;

    #[test]
    fn session_reaches_exactly_one_terminal_state() {
        let result = simulated_session(42, 200, 100).run();

        assert!(matches!(
            result.outcome,
            Outcome::Won | Outcome::TimedOut | Outcome::Lost | Outcome::Aborted
        ));
        assert!(!result.ticks.is_empty());
        assert_eq!(result.stats.ticks, result.ticks.len());
    }

    #[test]
    fn timeout_fires_at_the_limit_never_earlier() {
        // Unreachable target, flat prices, 1s cadence from t=0: the limit
        // of 30s is reached exactly at the 31st sample.
        let result = GameSession::new(
            session_config(1000.0, 30),
            Box::new(ScriptFeed::from_prices(&[60_000.0; 100])),
            bank(),
            Box::new(ScriptedPolicy::new(vec![])),
        )
        .run();

        assert_eq!(result.outcome, Outcome::TimedOut);
        assert_eq!(result.ticks.len(), 31);
        assert!((result.end_time - result.start_time).num_seconds() >= 30);
    }

    #[test]
    fn won_at_first_tick_where_equity_reaches_target() {
        // Buy 95% at 100. The path 100 → 110 → 116 gives equity
        // 5 + 0.95×110 = 109.5, then 5 + 0.95×116 = 115.2: the target is
        // crossed exactly at the third tick, not before.
        let result = GameSession::new(
            session_config(15.0, 600),
            Box::new(ScriptFeed::from_prices(&[100.0, 110.0, 116.0, 500.0])),
            bank(),
            Box::new(ScriptedPolicy::new(vec![Signal::Buy { size: 0.95 }])),
        )
        .run();

        assert_eq!(result.outcome, Outcome::Won);
        assert_eq!(result.ticks.len(), 3);
        assert!(result.final_equity >= 115.0);
    }

    #[test]
    fn feed_exhaustion_aborts_with_history_preserved() {
        let result = GameSession::new(
            session_config(15.0, 600),
            Box::new(ScriptFeed::from_prices(&[100.0, 101.0])),
            bank(),
            Box::new(ScriptedPolicy::new(vec![])),
        )
        .run();

        assert_eq!(result.outcome, Outcome::Aborted);
        assert_eq!(result.ticks.len(), 2);
    }
}

mod determinism {
    use super::*;

    fn run_once(seed: u64) -> SessionResult {
        simulated_session(seed, 150, 120).run()
    }

    #[test]
    fn same_seed_reproduces_the_tick_history_byte_for_byte() {
        let a = run_once(42);
        let b = run_once(42);

        assert_eq!(a.outcome, b.outcome);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap(),
        );
    }

    #[test]
    fn different_seeds_diverge() {
        let a = run_once(1);
        let b = run_once(2);
        assert_ne!(
            serde_json::to_string(&a.ticks).unwrap(),
            serde_json::to_string(&b.ticks).unwrap(),
        );
    }
}

mod ledger_invariants {
    use super::*;

    #[test]
    fn balances_stay_valid_across_a_whole_session() {
        let result = GameSession::new(
            session_config(1000.0, 600),
            Box::new(ScriptFeed::from_prices(&[
                100.0, 90.0, 110.0, 80.0, 120.0, 95.0, 105.0,
            ])),
            bank(),
            Box::new(AlwaysBuy),
        )
        .run();

        for tick in &result.ticks {
            assert!(tick.state.cash >= 0.0);
            assert!(tick.state.position.quantity >= 0.0);
            let identity = tick.state.cash + tick.state.position.quantity * tick.sample.price;
            assert!(
                (tick.state.equity - identity).abs() < 1e-9,
                "equity identity broken at tick {:?}",
                tick.sample.timestamp,
            );
        }
    }

    #[test]
    fn fees_accrue_monotonically() {
        let mut config = session_config(1000.0, 600);
        config.fee_rate = 0.001;
        let result = GameSession::new(
            config,
            Box::new(ScriptFeed::from_prices(&[100.0; 5])),
            bank(),
            Box::new(AlwaysBuy),
        )
        .run();

        let mut last = 0.0;
        for tick in &result.ticks {
            assert!(tick.state.fees_accrued >= last);
            last = tick.state.fees_accrued;
        }
        assert!(last > 0.0);
    }
}

mod strategy_warmup {
    use super::*;

    #[test]
    fn no_trades_before_any_indicator_is_defined() {
        // 3 samples is below even the short MA warmup: every voter
        // abstains and the session can only hold.
        let result = GameSession::new(
            session_config(15.0, 600),
            Box::new(ScriptFeed::from_prices(&[100.0, 50.0, 200.0])),
            bank(),
            Box::new(VotingStrategy::standard(0.95, 1.0)),
        )
        .run();

        assert!(result.ticks.iter().all(|t| t.signal == Signal::Hold));
        assert_eq!(result.stats.trades, 0);
    }
}

mod risk_gate {
    use super::*;

    fn gated_session(prices: &[(i64, f64)], max_daily_trades: u32) -> GameSession {
        GameSession::new(
            session_config(10_000.0, 600_000),
            Box::new(ScriptFeed::from_pairs(prices)),
            bank(),
            Box::new(AlwaysBuy),
        )
        .with_live_controls(
            RiskGate::new(RiskLimits {
                trading_enabled: true,
                max_daily_trades,
                max_daily_drawdown_percent: 90.0,
            }),
            Box::new(PaperExecution),
        )
    }

    #[test]
    fn excess_trades_degrade_to_hold() {
        let prices: Vec<(i64, f64)> = (0..5).map(|i| (i, 100.0)).collect();
        let result = gated_session(&prices, 2).run();

        assert_eq!(result.stats.trades, 2);
        let signals: Vec<&Signal> = result.ticks.iter().map(|t| &t.signal).collect();
        assert!(matches!(signals[0], Signal::Buy { .. }));
        assert!(matches!(signals[1], Signal::Buy { .. }));
        assert_eq!(*signals[2], Signal::Hold);
        assert_eq!(*signals[3], Signal::Hold);
    }

    #[test]
    fn trade_budget_resets_at_the_day_boundary() {
        // Three samples just before midnight, two just after. With a
        // budget of 2 per day: buys on the first two, a denial on the
        // third, then the counter resets and buying resumes.
        let prices = [
            (86_397, 100.0),
            (86_398, 100.0),
            (86_399, 100.0),
            (86_400, 100.0),
            (86_401, 100.0),
        ];
        let result = gated_session(&prices, 2).run();

        let buys: Vec<bool> = result
            .ticks
            .iter()
            .map(|t| matches!(t.signal, Signal::Buy { .. }))
            .collect();
        assert_eq!(buys, vec![true, true, false, true, true]);
        assert_eq!(result.stats.trades, 4);
    }

    #[test]
    fn disabled_trading_denies_everything() {
        let session = GameSession::new(
            session_config(15.0, 600),
            Box::new(ScriptFeed::from_prices(&[100.0; 3])),
            bank(),
            Box::new(AlwaysBuy),
        )
        .with_live_controls(
            RiskGate::new(RiskLimits {
                trading_enabled: false,
                max_daily_trades: 10,
                max_daily_drawdown_percent: 90.0,
            }),
            Box::new(PaperExecution),
        );
        let result = session.run();

        assert_eq!(result.stats.trades, 0);
        assert!(result.ticks.iter().all(|t| t.signal == Signal::Hold));
    }
}
