// =============================================================================
// Broker port: the boundary to the trading platform
// =============================================================================
//
// The platform is consumed in two ways only: as a source of historical bars
// and as a sink for order requests. A session is an explicit handle: it is
// acquired by constructing it and released with `shutdown`, after which every
// call fails. Nothing about the connection lives in global state.
// =============================================================================

pub mod paper;

pub use paper::PaperBroker;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::market_data::Bar;

/// Bar interval requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::M1 => "M1",
            Self::M5 => "M5",
            Self::M15 => "M15",
            Self::M30 => "M30",
            Self::H1 => "H1",
            Self::H4 => "H4",
            Self::D1 => "D1",
        };
        f.write_str(s)
    }
}

/// Historical range request for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct BarQuery {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// How long an order stays working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    GoodTillCancelled,
    Day,
}

/// What happens to the unfilled remainder of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillPolicy {
    FillOrKill,
    #[default]
    ImmediateOrCancel,
    Return,
}

/// A market order with protective levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub volume: f64,
    pub side: OrderSide,
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Maximum accepted slippage, in points.
    pub deviation: u32,
    /// Identifying tag for orders placed by this system.
    pub magic: u64,
    pub comment: String,
    pub time_in_force: TimeInForce,
    pub fill_policy: FillPolicy,
}

/// Platform verdict on a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderOutcome {
    Accepted { ticket: String },
    Rejected { reason: String },
}

impl std::fmt::Display for OrderOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted { ticket } => write!(f, "Accepted({ticket})"),
            Self::Rejected { reason } => write!(f, "Rejected({reason})"),
        }
    }
}

/// An open connection to a trading platform.
#[async_trait]
pub trait BrokerSession: Send + Sync {
    /// Bars for `query`, oldest first.
    async fn fetch_bars(&self, query: &BarQuery) -> Result<Vec<Bar>>;

    /// Submit an order. A platform-side rejection is an `Ok(Rejected)`;
    /// `Err` is reserved for the session itself being unusable.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderOutcome>;

    /// Release the session. Subsequent calls return an error.
    async fn shutdown(&self) -> Result<()>;
}
