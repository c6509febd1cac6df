//! Live price feed polling the CoinGecko simple-price endpoint.
//!
//! Transient failures (network errors, non-success statuses including 429)
//! are retried with bounded exponential backoff; once the retry budget is
//! spent the feed surfaces `FeedUnavailable` and stays exhausted. Polls are
//! paced so consecutive samples are at least one tick interval apart. The
//! feed never fabricates a price.

use chrono::Utc;
use serde::Deserialize;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::domain::error::GameError;
use crate::domain::price::PriceSample;
use crate::ports::price_feed::PriceFeed;

pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

const BACKOFF_BASE: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: UsdQuote,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: f64,
}

pub struct CoinGeckoFeed {
    client: reqwest::blocking::Client,
    url: String,
    poll_interval: Duration,
    max_retries: u32,
    last_poll: Option<Instant>,
    exhausted: bool,
}

impl CoinGeckoFeed {
    pub fn new(
        url: impl Into<String>,
        poll_interval: Duration,
        max_retries: u32,
        timeout: Duration,
    ) -> Result<Self, GameError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GameError::FeedUnavailable {
                reason: format!("could not build HTTP client: {e}"),
            })?;
        Ok(CoinGeckoFeed {
            client,
            url: url.into(),
            poll_interval,
            max_retries,
            last_poll: None,
            exhausted: false,
        })
    }

    fn fetch_price(&self) -> Result<f64, String> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("ids", "bitcoin"), ("vs_currencies", "usd")])
            .send()
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let quote: SimplePriceResponse = response.json().map_err(|e| e.to_string())?;
        if quote.bitcoin.usd <= 0.0 {
            return Err(format!("non-positive price {}", quote.bitcoin.usd));
        }
        Ok(quote.bitcoin.usd)
    }

    fn pace(&self) {
        if let Some(last) = self.last_poll {
            let since = last.elapsed();
            if since < self.poll_interval {
                thread::sleep(self.poll_interval - since);
            }
        }
    }
}

/// Backoff before retry `attempt` (0-based): 1s, 2s, 4s, ... capped.
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    (BACKOFF_BASE * factor).min(BACKOFF_CAP)
}

impl PriceFeed for CoinGeckoFeed {
    fn next(&mut self) -> Result<Option<PriceSample>, GameError> {
        if self.exhausted {
            return Ok(None);
        }
        self.pace();

        let mut last_error = String::new();
        for attempt in 0..self.max_retries {
            match self.fetch_price() {
                Ok(price) => {
                    self.last_poll = Some(Instant::now());
                    debug!("BTC price {:.2}", price);
                    return Ok(Some(PriceSample {
                        timestamp: Utc::now(),
                        price,
                    }));
                }
                Err(reason) => {
                    last_error = reason;
                    let delay = backoff_delay(attempt);
                    warn!(
                        "price fetch failed (attempt {}/{}): {}; retrying in {:?}",
                        attempt + 1,
                        self.max_retries,
                        last_error,
                        delay,
                    );
                    if attempt + 1 < self.max_retries {
                        thread::sleep(delay);
                    }
                }
            }
        }

        self.exhausted = true;
        Err(GameError::FeedUnavailable {
            reason: format!("{} attempts failed, last: {}", self.max_retries, last_error),
        })
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
