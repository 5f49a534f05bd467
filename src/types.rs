// =============================================================================
// Shared types used across the VWAP signal server
// =============================================================================

use serde::{Deserialize, Serialize};

/// Three-way classification of the close price against the VWAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

impl Signal {
    /// Classify a close against the VWAP at the same row.
    ///
    /// Anything that is neither strictly above nor strictly below (including
    /// a NaN comparison) is treated as equilibrium.
    pub fn classify(close: f64, vwap: f64) -> Self {
        if close > vwap {
            Self::Buy
        } else if close < vwap {
            Self::Sell
        } else {
            Self::Neutral
        }
    }

    /// Fixed human-readable explanation for the signal.
    pub fn explanation(self) -> &'static str {
        match self {
            Self::Buy => {
                "The price is trading above the VWAP, indicating bullish market tendencies."
            }
            Self::Sell => {
                "The price is trading below the VWAP, indicating bearish market tendencies."
            }
            Self::Neutral => {
                "The price is trading at the VWAP, indicating equilibrium in the market."
            }
        }
    }

    /// Whether this signal carries an actionable entry point.
    pub fn is_directional(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}
