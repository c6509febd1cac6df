//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::coingecko_feed::{CoinGeckoFeed, DEFAULT_API_URL};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::paper_execution::PaperExecution;
use crate::adapters::sim_feed::SimulatedFeed;
use crate::domain::config_validation::{
    DataSource, parse_data_source, validate_exchange_credentials, validate_feed_config,
    validate_game_config, validate_risk_config, validate_simulated_config,
    validate_strategy_config,
};
use crate::domain::error::GameError;
use crate::domain::indicator::{IndicatorBank, IndicatorParams};
use crate::domain::risk::{RiskGate, RiskLimits};
use crate::domain::session::{GameSession, SessionConfig, SessionResult};
use crate::domain::strategy::VotingStrategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_feed::PriceFeed;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradegame", about = "Bitcoin trading practice game")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a game session
    Play {
        #[arg(short, long)]
        config: PathBuf,
        /// Report output directory (default: [report] output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override [game] starting_balance
        #[arg(long)]
        balance: Option<f64>,
        /// Override [game] target_percent
        #[arg(long)]
        target: Option<f64>,
        /// Override [game] time_limit_seconds
        #[arg(long)]
        time_limit: Option<u64>,
        /// Force the simulated feed regardless of [game] data_source
        #[arg(long)]
        simulated: bool,
        /// Override [simulated] seed
        #[arg(long)]
        seed: Option<u64>,
        /// Validate and echo the resolved settings without playing
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// CLI overrides applied on top of the config file.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayOverrides {
    pub balance: Option<f64>,
    pub target: Option<f64>,
    pub time_limit: Option<u64>,
    pub simulated: bool,
    pub seed: Option<u64>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Play {
            config,
            output,
            balance,
            target,
            time_limit,
            simulated,
            seed,
            dry_run,
        } => {
            let overrides = PlayOverrides {
                balance,
                target,
                time_limit,
                simulated,
                seed,
            };
            if dry_run {
                run_dry_run(&config, overrides)
            } else {
                run_play(&config, output.as_deref(), overrides)
            }
        }
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &std::path::Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = GameError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn validate_all(adapter: &FileConfigAdapter, source: DataSource) -> Result<(), GameError> {
    validate_game_config(adapter)?;
    validate_strategy_config(adapter)?;
    match source {
        DataSource::Simulated => validate_simulated_config(adapter)?,
        DataSource::Live => {
            validate_feed_config(adapter)?;
            validate_risk_config(adapter)?;
            validate_exchange_credentials(adapter)?;
        }
    }
    Ok(())
}

fn resolve_data_source(
    adapter: &FileConfigAdapter,
    overrides: PlayOverrides,
) -> Result<DataSource, GameError> {
    if overrides.simulated {
        Ok(DataSource::Simulated)
    } else {
        parse_data_source(adapter)
    }
}

pub fn build_session_config(
    adapter: &dyn ConfigPort,
    overrides: PlayOverrides,
) -> SessionConfig {
    SessionConfig {
        starting_balance: overrides
            .balance
            .unwrap_or_else(|| adapter.get_double("game", "starting_balance", 100.0)),
        target_percent: overrides
            .target
            .unwrap_or_else(|| adapter.get_double("game", "target_percent", 15.0)),
        time_limit: Duration::from_secs(
            overrides
                .time_limit
                .unwrap_or_else(|| adapter.get_int("game", "time_limit_seconds", 60) as u64),
        ),
        fee_rate: adapter.get_double("game", "fee_rate", 0.001),
    }
}

pub fn build_indicator_params(adapter: &dyn ConfigPort) -> IndicatorParams {
    IndicatorParams {
        ma_short: adapter.get_int("strategy", "fast_ma_period", 4) as usize,
        ma_long: adapter.get_int("strategy", "slow_ma_period", 12) as usize,
        rsi_period: adapter.get_int("strategy", "rsi_period", 10) as usize,
        macd_fast: adapter.get_int("strategy", "macd_fast", 8) as usize,
        macd_slow: adapter.get_int("strategy", "macd_slow", 18) as usize,
        macd_signal: adapter.get_int("strategy", "macd_signal", 5) as usize,
        bollinger_period: adapter.get_int("strategy", "bollinger_period", 15) as usize,
        bollinger_mult: adapter.get_double("strategy", "bollinger_stddev", 1.8),
        stoch_k: adapter.get_int("strategy", "stoch_k_period", 10) as usize,
        stoch_smooth: adapter.get_int("strategy", "stoch_smooth", 3) as usize,
        stoch_d: adapter.get_int("strategy", "stoch_d_period", 3) as usize,
    }
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> VotingStrategy {
    use crate::domain::strategy::IndicatorRule;

    let rules = vec![
        IndicatorRule::MaCrossover,
        IndicatorRule::RsiThreshold {
            oversold: adapter.get_double("strategy", "rsi_oversold", 35.0),
            overbought: adapter.get_double("strategy", "rsi_overbought", 65.0),
        },
        IndicatorRule::MacdCrossover,
        IndicatorRule::BollingerBreakout,
        IndicatorRule::StochasticCrossover {
            oversold: adapter.get_double("strategy", "stoch_oversold", 30.0),
            overbought: adapter.get_double("strategy", "stoch_overbought", 70.0),
        },
    ];

    VotingStrategy::new(
        rules,
        adapter.get_double("strategy", "size_fraction", 0.95),
        adapter.get_double("strategy", "max_position", 1.0),
    )
}

pub fn build_risk_limits(adapter: &dyn ConfigPort) -> RiskLimits {
    RiskLimits {
        trading_enabled: adapter.get_bool("risk", "trading_enabled", false),
        max_daily_trades: adapter.get_int("risk", "max_daily_trades", 10).max(0) as u32,
        max_daily_drawdown_percent: adapter.get_double("risk", "max_daily_drawdown_percent", 5.0),
    }
}

fn build_feed(
    adapter: &FileConfigAdapter,
    source: DataSource,
    overrides: PlayOverrides,
) -> Result<Box<dyn PriceFeed>, GameError> {
    let tick_interval =
        Duration::from_secs(adapter.get_int("game", "tick_interval_seconds", 1) as u64);

    match source {
        DataSource::Simulated => {
            let seed = overrides
                .seed
                .unwrap_or_else(|| adapter.get_int("simulated", "seed", 0).max(0) as u64);
            let feed = SimulatedFeed::new(
                adapter.get_double("simulated", "start_price", 60_000.0),
                adapter.get_double("simulated", "volatility", 0.001),
                adapter.get_double("simulated", "drift", 0.0),
                seed,
                chrono::Utc::now(),
                tick_interval,
            )
            .with_real_time_pacing();
            Ok(Box::new(feed))
        }
        DataSource::Live => {
            let url = adapter
                .get_string("feed", "api_url")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string());
            let feed = CoinGeckoFeed::new(
                url,
                tick_interval,
                adapter.get_int("feed", "max_retries", 3).max(1) as u32,
                Duration::from_secs(adapter.get_int("feed", "timeout_seconds", 10).max(1) as u64),
            )?;
            Ok(Box::new(feed))
        }
    }
}

fn run_play(
    config_path: &std::path::Path,
    output: Option<&std::path::Path>,
    overrides: PlayOverrides,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let source = match resolve_data_source(&adapter, overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_all(&adapter, source) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let session_config = build_session_config(&adapter, overrides);
    let params = build_indicator_params(&adapter);
    let strategy = build_strategy(&adapter);

    let feed = match build_feed(&adapter, source, overrides) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match source {
        DataSource::Live => {
            eprintln!("Using LIVE Bitcoin prices (orders stay on paper)")
        }
        DataSource::Simulated => eprintln!("Using simulated price data"),
    }
    eprintln!(
        "Target: {:.1}% profit within {}s on {:.2} starting balance",
        session_config.target_percent,
        session_config.time_limit.as_secs(),
        session_config.starting_balance,
    );

    let session = GameSession::new(
        session_config.clone(),
        feed,
        IndicatorBank::new(params),
        Box::new(strategy),
    );
    let session = match source {
        DataSource::Live => session.with_live_controls(
            RiskGate::new(build_risk_limits(&adapter)),
            Box::new(PaperExecution),
        ),
        DataSource::Simulated => session,
    };

    let result = session.run();
    print_summary(&session_config, &result);

    let output_dir = output
        .map(PathBuf::from)
        .or_else(|| adapter.get_string("report", "output_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("game_results"));

    for writer in [&CsvReportAdapter as &dyn ReportPort, &JsonReportAdapter] {
        match writer.write(&result, &output_dir) {
            Ok(path) => eprintln!("Report written to: {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_summary(config: &SessionConfig, result: &SessionResult) {
    let profit = result.final_equity - config.starting_balance;
    let profit_pct = profit / config.starting_balance * 100.0;

    eprintln!("\n=== Session Result ===");
    eprintln!("Outcome:        {}", result.outcome.label());
    eprintln!("Final equity:   {:.2}", result.final_equity);
    eprintln!("Profit:         {:+.2} ({:+.2}%)", profit, profit_pct);
    eprintln!("Trades:         {}", result.stats.trades);
    eprintln!("Ticks:          {}", result.stats.ticks);
    if result.stats.ticks > 0 {
        eprintln!(
            "Price range:    {:.2} - {:.2}",
            result.stats.price_low, result.stats.price_high,
        );
        eprintln!(
            "Equity range:   {:.2} - {:.2}",
            result.stats.lowest_equity, result.stats.highest_equity,
        );
    }
}

fn run_dry_run(config_path: &std::path::Path, overrides: PlayOverrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let source = match resolve_data_source(&adapter, overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_all(&adapter, source) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let session_config = build_session_config(&adapter, overrides);
    let params = build_indicator_params(&adapter);

    eprintln!("\nResolved session:");
    eprintln!("  starting_balance: {:.2}", session_config.starting_balance);
    eprintln!("  target_percent:   {:.1}", session_config.target_percent);
    eprintln!("  time_limit:       {}s", session_config.time_limit.as_secs());
    eprintln!("  fee_rate:         {}", session_config.fee_rate);
    eprintln!(
        "  data_source:      {}",
        match source {
            DataSource::Live => "live",
            DataSource::Simulated => "simulated",
        }
    );
    eprintln!(
        "  indicator window: {} samples",
        params.window_capacity()
    );

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &std::path::Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let source = match parse_data_source(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_all(&adapter, source) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}
