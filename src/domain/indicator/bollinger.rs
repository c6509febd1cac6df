//! Bollinger Bands.
//!
//! - Middle: SMA over n prices
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is population standard deviation (divides by N, not N-1).
//! Warmup: undefined until the window holds `period` prices.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bands over the last `period` prices, or `None` during warmup.
pub fn calculate_bollinger(
    prices: &[f64],
    period: usize,
    multiplier: f64,
) -> Option<BollingerValue> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let tail = &prices[prices.len() - period..];
    let middle = tail.iter().sum::<f64>() / period as f64;
    let variance = tail
        .iter()
        .map(|p| {
            let diff = p - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let stddev = variance.sqrt();

    Some(BollingerValue {
        upper: middle + multiplier * stddev,
        middle,
        lower: middle - multiplier * stddev,
    })
}
