//! Configuration validation.
//!
//! Every field is checked before a session is constructed; a bad value
//! fails fast with a descriptive reason and no partial session exists.

use crate::domain::error::GameError;
use crate::ports::config_port::ConfigPort;

/// Which feed the session runs against, from `[game] data_source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Simulated,
}

pub fn parse_data_source(config: &dyn ConfigPort) -> Result<DataSource, GameError> {
    let value = config
        .get_string("game", "data_source")
        .unwrap_or_else(|| "simulated".to_string());
    match value.trim().to_lowercase().as_str() {
        "live" => Ok(DataSource::Live),
        "simulated" => Ok(DataSource::Simulated),
        other => Err(GameError::ConfigInvalid {
            section: "game".to_string(),
            key: "data_source".to_string(),
            reason: format!("expected 'live' or 'simulated', got '{}'", other),
        }),
    }
}

pub fn validate_game_config(config: &dyn ConfigPort) -> Result<(), GameError> {
    validate_starting_balance(config)?;
    validate_target_percent(config)?;
    validate_time_limit(config)?;
    validate_tick_interval(config)?;
    validate_fee_rate(config)?;
    parse_data_source(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), GameError> {
    validate_size_fraction(config)?;
    validate_max_position(config)?;
    validate_ma_periods(config)?;
    validate_rsi_settings(config)?;
    validate_macd_periods(config)?;
    validate_bollinger_settings(config)?;
    validate_stochastic_settings(config)?;
    Ok(())
}

pub fn validate_simulated_config(config: &dyn ConfigPort) -> Result<(), GameError> {
    let start_price = config.get_double("simulated", "start_price", 60_000.0);
    if start_price <= 0.0 {
        return Err(invalid("simulated", "start_price", "must be positive"));
    }
    let volatility = config.get_double("simulated", "volatility", 0.001);
    if volatility < 0.0 {
        return Err(invalid("simulated", "volatility", "must be non-negative"));
    }
    Ok(())
}

pub fn validate_feed_config(config: &dyn ConfigPort) -> Result<(), GameError> {
    let max_retries = config.get_int("feed", "max_retries", 3);
    if max_retries < 1 {
        return Err(invalid("feed", "max_retries", "must be at least 1"));
    }
    let timeout = config.get_int("feed", "timeout_seconds", 10);
    if timeout < 1 {
        return Err(invalid("feed", "timeout_seconds", "must be at least 1"));
    }
    Ok(())
}

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), GameError> {
    let max_trades = config.get_int("risk", "max_daily_trades", 10);
    if max_trades < 0 {
        return Err(invalid("risk", "max_daily_trades", "must be non-negative"));
    }
    let max_drawdown = config.get_double("risk", "max_daily_drawdown_percent", 5.0);
    if max_drawdown <= 0.0 {
        return Err(invalid(
            "risk",
            "max_daily_drawdown_percent",
            "must be positive",
        ));
    }
    Ok(())
}

/// Live mode only checks the credentials are present; they are opaque to
/// the engine.
pub fn validate_exchange_credentials(config: &dyn ConfigPort) -> Result<(), GameError> {
    for key in ["api_key", "api_secret"] {
        match config.get_string("exchange", key) {
            Some(value) if !value.trim().is_empty() => {}
            _ => {
                return Err(GameError::ConfigMissing {
                    section: "exchange".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> GameError {
    GameError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_starting_balance(config: &dyn ConfigPort) -> Result<(), GameError> {
    let value = config.get_double("game", "starting_balance", 100.0);
    if value <= 0.0 {
        return Err(invalid("game", "starting_balance", "must be positive"));
    }
    Ok(())
}

fn validate_target_percent(config: &dyn ConfigPort) -> Result<(), GameError> {
    let value = config.get_double("game", "target_percent", 15.0);
    if value <= 0.0 {
        return Err(invalid("game", "target_percent", "must be positive"));
    }
    Ok(())
}

fn validate_time_limit(config: &dyn ConfigPort) -> Result<(), GameError> {
    let value = config.get_int("game", "time_limit_seconds", 60);
    if value < 1 {
        return Err(invalid("game", "time_limit_seconds", "must be at least 1"));
    }
    Ok(())
}

fn validate_tick_interval(config: &dyn ConfigPort) -> Result<(), GameError> {
    let value = config.get_int("game", "tick_interval_seconds", 1);
    if value < 1 {
        return Err(invalid("game", "tick_interval_seconds", "must be at least 1"));
    }
    Ok(())
}

fn validate_fee_rate(config: &dyn ConfigPort) -> Result<(), GameError> {
    let value = config.get_double("game", "fee_rate", 0.001);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid("game", "fee_rate", "must be in [0, 1)"));
    }
    Ok(())
}

fn validate_size_fraction(config: &dyn ConfigPort) -> Result<(), GameError> {
    let value = config.get_double("strategy", "size_fraction", 0.95);
    if value <= 0.0 || value > 1.0 {
        return Err(invalid("strategy", "size_fraction", "must be in (0, 1]"));
    }
    Ok(())
}

fn validate_max_position(config: &dyn ConfigPort) -> Result<(), GameError> {
    let value = config.get_double("strategy", "max_position", 1.0);
    if value <= 0.0 {
        return Err(invalid("strategy", "max_position", "must be positive"));
    }
    Ok(())
}

fn validate_ma_periods(config: &dyn ConfigPort) -> Result<(), GameError> {
    let fast = config.get_int("strategy", "fast_ma_period", 4);
    let slow = config.get_int("strategy", "slow_ma_period", 12);
    if fast < 1 {
        return Err(invalid("strategy", "fast_ma_period", "must be at least 1"));
    }
    if slow < 1 {
        return Err(invalid("strategy", "slow_ma_period", "must be at least 1"));
    }
    if fast >= slow {
        return Err(invalid(
            "strategy",
            "fast_ma_period",
            "must be shorter than slow_ma_period",
        ));
    }
    Ok(())
}

fn validate_rsi_settings(config: &dyn ConfigPort) -> Result<(), GameError> {
    let period = config.get_int("strategy", "rsi_period", 10);
    if period < 1 {
        return Err(invalid("strategy", "rsi_period", "must be at least 1"));
    }
    let oversold = config.get_double("strategy", "rsi_oversold", 35.0);
    let overbought = config.get_double("strategy", "rsi_overbought", 65.0);
    if !(0.0..100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "strategy",
            "rsi_oversold",
            "thresholds must be within 0..100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "strategy",
            "rsi_oversold",
            "must be below rsi_overbought",
        ));
    }
    Ok(())
}

fn validate_macd_periods(config: &dyn ConfigPort) -> Result<(), GameError> {
    let fast = config.get_int("strategy", "macd_fast", 8);
    let slow = config.get_int("strategy", "macd_slow", 18);
    let signal = config.get_int("strategy", "macd_signal", 5);
    if fast < 1 || slow < 1 || signal < 1 {
        return Err(invalid("strategy", "macd_fast", "periods must be at least 1"));
    }
    if fast >= slow {
        return Err(invalid(
            "strategy",
            "macd_fast",
            "must be shorter than macd_slow",
        ));
    }
    Ok(())
}

fn validate_bollinger_settings(config: &dyn ConfigPort) -> Result<(), GameError> {
    let period = config.get_int("strategy", "bollinger_period", 15);
    if period < 2 {
        return Err(invalid("strategy", "bollinger_period", "must be at least 2"));
    }
    let stddev = config.get_double("strategy", "bollinger_stddev", 1.8);
    if stddev <= 0.0 {
        return Err(invalid("strategy", "bollinger_stddev", "must be positive"));
    }
    Ok(())
}

fn validate_stochastic_settings(config: &dyn ConfigPort) -> Result<(), GameError> {
    let k = config.get_int("strategy", "stoch_k_period", 10);
    let smooth = config.get_int("strategy", "stoch_smooth", 3);
    let d = config.get_int("strategy", "stoch_d_period", 3);
    if k < 1 || smooth < 1 || d < 1 {
        return Err(invalid(
            "strategy",
            "stoch_k_period",
            "periods must be at least 1",
        ));
    }
    let oversold = config.get_double("strategy", "stoch_oversold", 30.0);
    let overbought = config.get_double("strategy", "stoch_overbought", 70.0);
    if oversold >= overbought {
        return Err(invalid(
            "strategy",
            "stoch_oversold",
            "must be below stoch_overbought",
        ));
    }
    Ok(())
}
