//! Technical indicators over a trailing price window.
//!
//! Each indicator lives in its own module as a pure function over a price
//! slice, returning `None` until its own warmup is satisfied. Callers must
//! treat an absent indicator as "no signal possible yet", never as zero.
//! [`IndicatorBank`] owns the window and assembles an [`IndicatorSnapshot`]
//! per tick.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod macd;
pub mod bollinger;
pub mod stochastic;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::price::{PriceSample, PriceWindow};
use self::bollinger::calculate_bollinger;
use self::macd::calculate_macd;
use self::rsi::calculate_rsi;
use self::sma::calculate_sma;
use self::stochastic::calculate_stochastic;

/// Lookback and smoothing parameters for the indicator set.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub ma_short: usize,
    pub ma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub stoch_k: usize,
    pub stoch_smooth: usize,
    pub stoch_d: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ma_short: 4,
            ma_long: 12,
            rsi_period: 10,
            macd_fast: 8,
            macd_slow: 18,
            macd_signal: 5,
            bollinger_period: 15,
            bollinger_mult: 1.8,
            stoch_k: 10,
            stoch_smooth: 3,
            stoch_d: 3,
        }
    }
}

impl IndicatorParams {
    /// Largest lookback any configured indicator needs; used as the
    /// trailing window capacity.
    pub fn window_capacity(&self) -> usize {
        [
            self.ma_short,
            self.ma_long,
            self.rsi_period + 1,
            self.macd_slow + self.macd_signal - 1,
            self.bollinger_period,
            self.stoch_k + self.stoch_smooth + self.stoch_d - 2,
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }
}

/// All indicator values for one tick. Every value is `None` until its
/// indicator's warmup is satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub stochastic_k: Option<f64>,
    pub stochastic_d: Option<f64>,
}

/// Owns the trailing window and recomputes every indicator on each sample.
/// Computation is pure given the window contents.
#[derive(Debug, Clone)]
pub struct IndicatorBank {
    params: IndicatorParams,
    window: PriceWindow,
}

impl IndicatorBank {
    pub fn new(params: IndicatorParams) -> Self {
        let capacity = params.window_capacity();
        IndicatorBank {
            params,
            window: PriceWindow::new(capacity),
        }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn window(&self) -> &PriceWindow {
        &self.window
    }

    /// Absorb a sample and return the snapshot for it.
    pub fn push(&mut self, sample: &PriceSample) -> IndicatorSnapshot {
        self.window.push(sample.clone());
        self.snapshot(sample)
    }

    fn snapshot(&self, sample: &PriceSample) -> IndicatorSnapshot {
        let prices = self.window.prices();
        let p = &self.params;

        let macd = calculate_macd(&prices, p.macd_fast, p.macd_slow, p.macd_signal);
        let bands = calculate_bollinger(&prices, p.bollinger_period, p.bollinger_mult);
        let stoch = calculate_stochastic(&prices, p.stoch_k, p.stoch_smooth, p.stoch_d);

        IndicatorSnapshot {
            timestamp: sample.timestamp,
            price: sample.price,
            ma_short: calculate_sma(&prices, p.ma_short),
            ma_long: calculate_sma(&prices, p.ma_long),
            rsi: calculate_rsi(&prices, p.rsi_period),
            macd_line: macd.map(|m| m.line),
            macd_signal: macd.map(|m| m.signal),
            bollinger_upper: bands.map(|b| b.upper),
            bollinger_middle: bands.map(|b| b.middle),
            bollinger_lower: bands.map(|b| b.lower),
            stochastic_k: stoch.map(|s| s.k),
            stochastic_d: stoch.map(|s| s.d),
        }
    }
}
