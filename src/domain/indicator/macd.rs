//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Warmup: undefined until the window holds `slow + signal - 1` prices
//! (the slow EMA needs `slow`, and the signal EMA needs `signal` MACD
//! values on top of that).

use crate::domain::indicator::ema::ema_series;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD of the full slice, or `None` during warmup.
pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Option<MacdValue> {
    if fast == 0 || slow == 0 || signal_period == 0 || fast >= slow {
        return None;
    }
    if prices.len() < slow + signal_period - 1 {
        return None;
    }

    let ema_fast = ema_series(prices, fast);
    let ema_slow = ema_series(prices, slow);

    // MACD line is defined from the slow warmup boundary onward.
    let macd_line: Vec<f64> = (slow - 1..prices.len())
        .map(|i| ema_fast[i] - ema_slow[i])
        .collect();

    let signal_series = ema_series(&macd_line, signal_period);
    let line = *macd_line.last()?;
    let signal = *signal_series.last()?;

    Some(MacdValue {
        line,
        signal,
        histogram: line - signal,
    })
}
