// =============================================================================
// Paper broker: in-memory session for demo runs and tests
// =============================================================================
//
// Serves bars from a fixed seed and fills orders locally with a synthetic
// ticket; no request leaves the process.
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{BarQuery, BrokerSession, OrderOutcome, OrderRequest, OrderSide};
use crate::market_data::Bar;

/// An accepted paper order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperFill {
    pub ticket: String,
    pub order: OrderRequest,
}

pub struct PaperBroker {
    bars: Vec<Bar>,
    fills: RwLock<Vec<PaperFill>>,
    open: AtomicBool,
}

impl PaperBroker {
    /// Open a session over `bars` (arrival order is kept).
    pub fn connect(bars: Vec<Bar>) -> Self {
        info!(bars = bars.len(), "paper broker session opened");
        Self {
            bars,
            fills: RwLock::new(Vec::new()),
            open: AtomicBool::new(true),
        }
    }

    /// Orders accepted so far, oldest first.
    pub fn fills(&self) -> Vec<PaperFill> {
        self.fills.read().clone()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if !self.is_open() {
            bail!("paper broker session has been shut down");
        }
        Ok(())
    }

    /// Reason an order would be refused, if any.
    fn validate(order: &OrderRequest) -> Option<String> {
        if !(order.volume.is_finite() && order.volume > 0.0) {
            return Some(format!("invalid volume {}", order.volume));
        }
        if !(order.price.is_finite() && order.price > 0.0) {
            return Some(format!("invalid price {}", order.price));
        }
        let protective_ok = match order.side {
            OrderSide::Buy => order.stop_loss < order.price && order.take_profit > order.price,
            OrderSide::Sell => order.stop_loss > order.price && order.take_profit < order.price,
        };
        if !protective_ok {
            return Some(format!(
                "invalid stops for {}: sl={} tp={} price={}",
                order.side, order.stop_loss, order.take_profit, order.price
            ));
        }
        None
    }
}

#[async_trait]
impl BrokerSession for PaperBroker {
    #[instrument(skip(self), name = "paper::fetch_bars")]
    async fn fetch_bars(&self, query: &BarQuery) -> Result<Vec<Bar>> {
        self.ensure_open()?;
        Ok(self
            .bars
            .iter()
            .filter(|b| b.date >= query.from && b.date <= query.to)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, order), name = "paper::submit_order", fields(symbol = %order.symbol, side = %order.side))]
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderOutcome> {
        self.ensure_open()?;

        if let Some(reason) = Self::validate(order) {
            warn!(reason = %reason, "paper order rejected");
            return Ok(OrderOutcome::Rejected { reason });
        }

        let ticket = Uuid::new_v4().to_string();
        self.fills.write().push(PaperFill {
            ticket: ticket.clone(),
            order: order.clone(),
        });
        info!(
            ticket = %ticket,
            price = order.price,
            volume = order.volume,
            sl = order.stop_loss,
            tp = order.take_profit,
            "paper fill"
        );
        Ok(OrderOutcome::Accepted { ticket })
    }

    async fn shutdown(&self) -> Result<()> {
        if self.open.swap(false, Ordering::AcqRel) {
            info!(fills = self.fills.read().len(), "paper broker session closed");
        }
        Ok(())
    }
}
