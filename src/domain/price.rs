//! Price samples and the trailing window the indicators compute over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One timestamped price observation from a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Fixed-capacity trailing window of price samples.
///
/// Capacity is the largest lookback any configured indicator needs; once
/// full, pushing a sample evicts the oldest one. Samples are expected in
/// strictly increasing timestamp order; a sample at or before the newest
/// one is ignored.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    samples: VecDeque<PriceSample>,
    capacity: usize,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        PriceWindow {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when the window is full.
    /// Returns false if the sample is out of order and was dropped.
    pub fn push(&mut self, sample: PriceSample) -> bool {
        if let Some(last) = self.samples.back() {
            if sample.timestamp <= last.timestamp {
                return false;
            }
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    /// Prices oldest-first, for indicator computation.
    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(secs: i64, price: f64) -> PriceSample {
        PriceSample {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            price,
        }
    }

    #[test]
    fn push_and_read_back() {
        let mut window = PriceWindow::new(3);
        assert!(window.is_empty());

        assert!(window.push(sample(1, 100.0)));
        assert!(window.push(sample(2, 101.0)));
        assert_eq!(window.len(), 2);
        assert_eq!(window.prices(), vec![100.0, 101.0]);
        assert_eq!(window.latest().unwrap().price, 101.0);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut window = PriceWindow::new(3);
        for i in 1..=5 {
            window.push(sample(i, 100.0 + i as f64));
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.prices(), vec![103.0, 104.0, 105.0]);
    }

    #[test]
    fn rejects_out_of_order_sample() {
        let mut window = PriceWindow::new(3);
        window.push(sample(10, 100.0));
        assert!(!window.push(sample(10, 101.0)));
        assert!(!window.push(sample(5, 102.0)));
        assert_eq!(window.len(), 1);
        assert_eq!(window.latest().unwrap().price, 100.0);
    }

    #[test]
    fn capacity_reported() {
        let window = PriceWindow::new(22);
        assert_eq!(window.capacity(), 22);
    }
}
