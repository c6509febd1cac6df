//! Simulated price feed: a seeded Gaussian random walk.
//!
//! step ~ Normal(drift × price, volatility × price), floored at a minimum
//! price. Timestamps advance logically by the tick interval from the
//! configured start time, so a fixed seed and configuration reproduce the
//! exact sample sequence the tests rely on.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::domain::error::GameError;
use crate::domain::price::PriceSample;
use crate::ports::price_feed::PriceFeed;

const MIN_PRICE: f64 = 0.01;

pub struct SimulatedFeed {
    rng: StdRng,
    price: f64,
    volatility: f64,
    drift: f64,
    next_timestamp: DateTime<Utc>,
    interval: Duration,
    remaining: Option<u64>,
    started: bool,
    pace: Option<std::time::Duration>,
}

impl SimulatedFeed {
    pub fn new(
        start_price: f64,
        volatility: f64,
        drift: f64,
        seed: u64,
        start_time: DateTime<Utc>,
        tick_interval: std::time::Duration,
    ) -> Self {
        SimulatedFeed {
            rng: StdRng::seed_from_u64(seed),
            price: start_price,
            volatility,
            drift,
            next_timestamp: start_time,
            interval: Duration::from_std(tick_interval).unwrap_or(Duration::seconds(1)),
            remaining: None,
            started: false,
            pace: None,
        }
    }

    /// Bound the feed; after `count` samples it reports end of stream.
    pub fn with_max_samples(mut self, count: u64) -> Self {
        self.remaining = Some(count);
        self
    }

    /// Sleep one tick interval between samples, matching the session's
    /// real-time cadence. Tests leave this off and run instantly.
    pub fn with_real_time_pacing(mut self) -> Self {
        self.pace = Some(
            self.interval
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(1)),
        );
        self
    }
}

impl PriceFeed for SimulatedFeed {
    fn next(&mut self) -> Result<Option<PriceSample>, GameError> {
        match self.remaining.as_mut() {
            Some(0) => return Ok(None),
            Some(n) => *n -= 1,
            None => {}
        }

        if self.started {
            if let Some(interval) = self.pace {
                std::thread::sleep(interval);
            }
            let z: f64 = self.rng.sample(StandardNormal);
            let step = self.drift * self.price + self.volatility * self.price * z;
            self.price = (self.price + step).max(MIN_PRICE);
            self.next_timestamp += self.interval;
        } else {
            self.started = true;
        }

        Ok(Some(PriceSample {
            timestamp: self.next_timestamp,
            price: self.price,
        }))
    }

    fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration as StdDuration;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn feed(seed: u64) -> SimulatedFeed {
        SimulatedFeed::new(
            60_000.0,
            0.001,
            0.0,
            seed,
            start_time(),
            StdDuration::from_secs(1),
        )
    }

    fn drain(feed: &mut SimulatedFeed, count: usize) -> Vec<PriceSample> {
        (0..count).map(|_| feed.next().unwrap().unwrap()).collect()
    }

    #[test]
    fn first_sample_is_the_start_price() {
        let mut feed = feed(42);
        let sample = feed.next().unwrap().unwrap();
        assert_eq!(sample.price, 60_000.0);
        assert_eq!(sample.timestamp, start_time());
    }

    #[test]
    fn same_seed_reproduces_the_sequence() {
        let a = drain(&mut feed(42), 50);
        let b = drain(&mut feed(42), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = drain(&mut feed(42), 50);
        let b = drain(&mut feed(43), 50);
        assert_ne!(a, b);
    }

    #[test]
    fn timestamps_advance_by_the_interval() {
        let samples = drain(&mut feed(7), 5);
        for (i, sample) in samples.iter().enumerate() {
            let expected = start_time() + Duration::seconds(i as i64);
            assert_eq!(sample.timestamp, expected);
        }
    }

    #[test]
    fn prices_stay_positive() {
        let mut feed = SimulatedFeed::new(
            1.0,
            5.0, // absurd volatility to force the floor
            0.0,
            42,
            start_time(),
            StdDuration::from_secs(1),
        );
        for _ in 0..200 {
            let sample = feed.next().unwrap().unwrap();
            assert!(sample.price >= MIN_PRICE);
        }
    }

    #[test]
    fn zero_volatility_with_drift_trends_deterministically() {
        let mut feed = SimulatedFeed::new(
            100.0,
            0.0,
            0.01,
            42,
            start_time(),
            StdDuration::from_secs(1),
        );
        let samples = drain(&mut feed, 3);
        assert_eq!(samples[0].price, 100.0);
        assert!((samples[1].price - 101.0).abs() < 1e-9);
        assert!((samples[2].price - 102.01).abs() < 1e-9);
    }

    #[test]
    fn bounded_feed_signals_end_of_stream() {
        let mut feed = feed(42).with_max_samples(3);
        assert!(!feed.is_exhausted());
        for _ in 0..3 {
            assert!(feed.next().unwrap().is_some());
        }
        assert_eq!(feed.next().unwrap(), None);
        assert!(feed.is_exhausted());
    }
}
