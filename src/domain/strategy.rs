//! Decision policy: indicator votes aggregated into one signal per tick.

use serde::{Deserialize, Serialize};

use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::position::Position;
use crate::domain::signal::Signal;

/// A pure, deterministic mapping from indicator state to a trading signal.
/// Given identical snapshots and positions the same signal must come back,
/// which makes a session's signal sequence reproducible.
pub trait DecisionPolicy {
    fn decide(&self, snapshot: &IndicatorSnapshot, position: &Position) -> Signal;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Bullish,
    Bearish,
    Neutral,
}

/// The closed set of indicator rules. Each rule votes from the snapshot
/// alone and abstains (`None`) while any of its inputs is still undefined,
/// so an unwarmed indicator can never tip a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndicatorRule {
    /// Short MA above long MA is bullish, below is bearish.
    MaCrossover,
    /// RSI at or below `oversold` is bullish, at or above `overbought`
    /// is bearish.
    RsiThreshold { oversold: f64, overbought: f64 },
    /// MACD line above its signal line is bullish, below is bearish.
    MacdCrossover,
    /// Close outside the Bollinger band: below the lower band is bullish
    /// (mean reversion), above the upper band is bearish.
    BollingerBreakout,
    /// %K crossing %D in the oversold region is bullish, crossing under
    /// %D in the overbought region is bearish.
    StochasticCrossover { oversold: f64, overbought: f64 },
}

impl IndicatorRule {
    pub fn vote(&self, snapshot: &IndicatorSnapshot) -> Option<Vote> {
        match self {
            IndicatorRule::MaCrossover => {
                let short = snapshot.ma_short?;
                let long = snapshot.ma_long?;
                Some(if short > long {
                    Vote::Bullish
                } else if short < long {
                    Vote::Bearish
                } else {
                    Vote::Neutral
                })
            }
            IndicatorRule::RsiThreshold {
                oversold,
                overbought,
            } => {
                let rsi = snapshot.rsi?;
                Some(if rsi <= *oversold {
                    Vote::Bullish
                } else if rsi >= *overbought {
                    Vote::Bearish
                } else {
                    Vote::Neutral
                })
            }
            IndicatorRule::MacdCrossover => {
                let line = snapshot.macd_line?;
                let signal = snapshot.macd_signal?;
                Some(if line > signal {
                    Vote::Bullish
                } else if line < signal {
                    Vote::Bearish
                } else {
                    Vote::Neutral
                })
            }
            IndicatorRule::BollingerBreakout => {
                let upper = snapshot.bollinger_upper?;
                let lower = snapshot.bollinger_lower?;
                Some(if snapshot.price < lower {
                    Vote::Bullish
                } else if snapshot.price > upper {
                    Vote::Bearish
                } else {
                    Vote::Neutral
                })
            }
            IndicatorRule::StochasticCrossover {
                oversold,
                overbought,
            } => {
                let k = snapshot.stochastic_k?;
                let d = snapshot.stochastic_d?;
                Some(if k <= *oversold && k > d {
                    Vote::Bullish
                } else if k >= *overbought && k < d {
                    Vote::Bearish
                } else {
                    Vote::Neutral
                })
            }
        }
    }
}

pub const DEFAULT_RSI_OVERSOLD: f64 = 35.0;
pub const DEFAULT_RSI_OVERBOUGHT: f64 = 65.0;
pub const DEFAULT_STOCH_OVERSOLD: f64 = 30.0;
pub const DEFAULT_STOCH_OVERBOUGHT: f64 = 70.0;

/// Majority-vote aggregation over a configurable rule set.
///
/// BUY needs a strict majority of bullish votes among the rules that did
/// not abstain, SELL a strict majority of bearish votes; everything else,
/// including ties, is HOLD. A BUY is only emitted while the held quantity
/// is below `max_position`, a SELL only while a position is open.
#[derive(Debug, Clone)]
pub struct VotingStrategy {
    rules: Vec<IndicatorRule>,
    size_fraction: f64,
    max_position: f64,
}

impl VotingStrategy {
    pub fn new(rules: Vec<IndicatorRule>, size_fraction: f64, max_position: f64) -> Self {
        VotingStrategy {
            rules,
            size_fraction,
            max_position,
        }
    }

    /// The five standard voters with default thresholds.
    pub fn standard(size_fraction: f64, max_position: f64) -> Self {
        Self::new(
            vec![
                IndicatorRule::MaCrossover,
                IndicatorRule::RsiThreshold {
                    oversold: DEFAULT_RSI_OVERSOLD,
                    overbought: DEFAULT_RSI_OVERBOUGHT,
                },
                IndicatorRule::MacdCrossover,
                IndicatorRule::BollingerBreakout,
                IndicatorRule::StochasticCrossover {
                    oversold: DEFAULT_STOCH_OVERSOLD,
                    overbought: DEFAULT_STOCH_OVERBOUGHT,
                },
            ],
            size_fraction,
            max_position,
        )
    }

    pub fn rules(&self) -> &[IndicatorRule] {
        &self.rules
    }
}

impl DecisionPolicy for VotingStrategy {
    fn decide(&self, snapshot: &IndicatorSnapshot, position: &Position) -> Signal {
        let votes: Vec<Vote> = self
            .rules
            .iter()
            .filter_map(|rule| rule.vote(snapshot))
            .collect();

        let defined = votes.len();
        if defined == 0 {
            return Signal::Hold;
        }

        let bullish = votes.iter().filter(|v| **v == Vote::Bullish).count();
        let bearish = votes.iter().filter(|v| **v == Vote::Bearish).count();

        if bullish * 2 > defined && position.quantity < self.max_position {
            Signal::Buy {
                size: self.size_fraction,
            }
        } else if bearish * 2 > defined && position.is_open() {
            Signal::Sell {
                size: self.size_fraction,
            }
        } else {
            Signal::Hold
        }
    }
}
