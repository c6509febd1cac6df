//! Price feed port trait.

use crate::domain::error::GameError;
use crate::domain::price::PriceSample;

/// An ordered source of timestamped prices.
///
/// `next` blocks until a sample for the current tick is available:
/// `Ok(Some(sample))` advances the session, `Ok(None)` signals a clean
/// end of stream, and `Err` signals an unrecoverable failure (retries
/// already exhausted inside the feed). Implementations must never
/// fabricate a price.
pub trait PriceFeed {
    fn next(&mut self) -> Result<Option<PriceSample>, GameError>;

    fn is_exhausted(&self) -> bool;
}
