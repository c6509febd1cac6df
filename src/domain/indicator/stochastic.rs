//! Stochastic Oscillator over the rolling high/low of the price window.
//!
//! Fast %K = 100 × (last − lowest) / (highest − lowest) over `k_period`
//! prices (50 when the range is zero). Slow %K = SMA(fast %K, smooth),
//! %D = SMA(slow %K, d_period).
//!
//! Warmup: undefined until the window holds
//! `k_period + smooth + d_period - 2` prices.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

/// Slow %K and %D of the full slice, or `None` during warmup.
pub fn calculate_stochastic(
    prices: &[f64],
    k_period: usize,
    smooth: usize,
    d_period: usize,
) -> Option<StochasticValue> {
    if k_period == 0 || smooth == 0 || d_period == 0 {
        return None;
    }
    let required = k_period + smooth + d_period - 2;
    if prices.len() < required {
        return None;
    }

    // Fast %K for every index with a full lookback, then the two SMA layers.
    let fast_k: Vec<f64> = (k_period - 1..prices.len())
        .map(|i| {
            let lookback = &prices[i + 1 - k_period..=i];
            let highest = lookback.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            let lowest = lookback.iter().fold(f64::INFINITY, |a, &b| a.min(b));
            if highest == lowest {
                50.0
            } else {
                100.0 * (prices[i] - lowest) / (highest - lowest)
            }
        })
        .collect();

    let slow_k: Vec<f64> = (smooth - 1..fast_k.len())
        .map(|i| fast_k[i + 1 - smooth..=i].iter().sum::<f64>() / smooth as f64)
        .collect();

    let k = *slow_k.last()?;
    let d_tail = &slow_k[slow_k.len().checked_sub(d_period)?..];
    let d = d_tail.iter().sum::<f64>() / d_period as f64;

    Some(StochasticValue { k, d })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stochastic_warmup() {
        let prices: Vec<f64> = (0..13).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_stochastic(&prices, 10, 3, 3), None);
    }

    #[test]
    fn stochastic_defined_at_required_length() {
        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert!(calculate_stochastic(&prices, 10, 3, 3).is_some());
    }

    #[test]
    fn stochastic_top_of_range_is_100() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let stoch = calculate_stochastic(&prices, 10, 3, 3).unwrap();
        assert!((stoch.k - 100.0).abs() < f64::EPSILON);
        assert!((stoch.d - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stochastic_bottom_of_range_is_0() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let stoch = calculate_stochastic(&prices, 10, 3, 3).unwrap();
        assert!(stoch.k.abs() < f64::EPSILON);
        assert!(stoch.d.abs() < f64::EPSILON);
    }

    #[test]
    fn stochastic_flat_range_is_50() {
        let prices = [100.0; 20];
        let stoch = calculate_stochastic(&prices, 10, 3, 3).unwrap();
        assert!((stoch.k - 50.0).abs() < f64::EPSILON);
        assert!((stoch.d - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stochastic_k_in_range() {
        let prices: Vec<f64> = (0..30)
            .map(|i| 100.0 + ((i % 11) as f64 - 5.0) * 1.5)
            .collect();
        let stoch = calculate_stochastic(&prices, 10, 3, 3).unwrap();
        assert!((0.0..=100.0).contains(&stoch.k));
        assert!((0.0..=100.0).contains(&stoch.d));
    }

    #[test]
    fn stochastic_zero_periods() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_stochastic(&prices, 0, 3, 3), None);
        assert_eq!(calculate_stochastic(&prices, 10, 0, 3), None);
        assert_eq!(calculate_stochastic(&prices, 10, 3, 0), None);
    }
}
