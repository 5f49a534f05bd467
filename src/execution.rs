// =============================================================================
// Order bridge: turns a directional signal into a broker order
// =============================================================================
//
// BUY enters at the VWAP entry point with the stop below and target above;
// SELL mirrors both. NEUTRAL never produces an order.
// =============================================================================

use anyhow::Result;
use tracing::{info, warn};

use crate::broker::{BrokerSession, OrderOutcome, OrderRequest, OrderSide};
use crate::engine::ResultRow;
use crate::runtime_config::ExecutionParams;
use crate::types::Signal;

/// Build the order for `row`, or `None` when the signal is NEUTRAL.
pub fn order_for_signal(
    row: &ResultRow,
    symbol: &str,
    params: &ExecutionParams,
) -> Option<OrderRequest> {
    let price = row.entry_point?;
    let (side, stop_loss, take_profit) = match row.signal {
        Signal::Buy => (OrderSide::Buy, price - params.sl_offset, price + params.tp_offset),
        Signal::Sell => (OrderSide::Sell, price + params.sl_offset, price - params.tp_offset),
        Signal::Neutral => return None,
    };

    Some(OrderRequest {
        symbol: symbol.to_string(),
        volume: params.lot,
        side,
        price,
        stop_loss,
        take_profit,
        deviation: params.deviation,
        magic: params.magic,
        comment: params.comment.clone(),
        time_in_force: params.time_in_force,
        fill_policy: params.fill_policy,
    })
}

/// Submit the bridged order for `row` through `session`.
///
/// Returns `Ok(None)` for NEUTRAL rows without touching the session.
pub async fn execute_signal<S: BrokerSession + ?Sized>(
    session: &S,
    row: &ResultRow,
    symbol: &str,
    params: &ExecutionParams,
) -> Result<Option<OrderOutcome>> {
    let Some(order) = order_for_signal(row, symbol, params) else {
        info!(symbol, signal = %row.signal, "no order for non-directional signal");
        return Ok(None);
    };

    let outcome = session.submit_order(&order).await?;
    match &outcome {
        OrderOutcome::Accepted { ticket } => info!(
            symbol,
            side = %order.side,
            price = order.price,
            ticket = %ticket,
            "order accepted"
        ),
        OrderOutcome::Rejected { reason } => {
            warn!(symbol, side = %order.side, reason = %reason, "order rejected")
        }
    }
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::PaperBroker;
    use chrono::NaiveDate;

    fn row(signal: Signal, vwap: f64) -> ResultRow {
        ResultRow {
            date: NaiveDate::from_ymd_opt(2024, 8, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            vwap,
            signal,
            signal_explanation: signal.explanation(),
            entry_point: signal.is_directional().then_some(vwap),
            major_support: vwap - 50.0,
            major_resistance: vwap + 50.0,
            minor_support: vwap - 10.0,
            minor_resistance: vwap + 10.0,
        }
    }

    #[test]
    fn buy_places_stop_below_and_target_above() {
        let params = ExecutionParams::default();
        let order = order_for_signal(&row(Signal::Buy, 2000.0), "XAUUSD", &params).unwrap();
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.price, 2000.0);
        assert_eq!(order.stop_loss, 1900.0);
        assert_eq!(order.take_profit, 2150.0);
        assert_eq!(order.volume, 0.01);
        assert_eq!(order.magic, 2_222_222);
    }

    #[test]
    fn sell_mirrors_levels() {
        let params = ExecutionParams::default();
        let order = order_for_signal(&row(Signal::Sell, 2000.0), "XAUUSD", &params).unwrap();
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.stop_loss, 2100.0);
        assert_eq!(order.take_profit, 1850.0);
    }

    #[test]
    fn neutral_has_no_order() {
        let params = ExecutionParams::default();
        assert!(order_for_signal(&row(Signal::Neutral, 2000.0), "XAUUSD", &params).is_none());
    }

    #[test]
    fn runtime_config_section_drives_the_order() {
        let json = r#"{ "execution": { "lot": 0.5, "sl_offset": 20.0, "magic": 7 } }"#;
        let cfg: crate::runtime_config::RuntimeConfig = serde_json::from_str(json).unwrap();
        let order =
            order_for_signal(&row(Signal::Buy, 2000.0), "XAUUSD", &cfg.execution).unwrap();
        assert_eq!(order.volume, 0.5);
        assert_eq!(order.stop_loss, 1980.0);
        assert_eq!(order.take_profit, 2150.0);
        assert_eq!(order.magic, 7);
    }

    #[tokio::test]
    async fn execute_routes_through_session() {
        let broker = PaperBroker::connect(Vec::new());
        let params = ExecutionParams::default();

        let outcome = execute_signal(&broker, &row(Signal::Buy, 2000.0), "XAUUSD", &params)
            .await
            .unwrap();
        assert!(matches!(outcome, Some(OrderOutcome::Accepted { .. })));

        let none = execute_signal(&broker, &row(Signal::Neutral, 2000.0), "XAUUSD", &params)
            .await
            .unwrap();
        assert!(none.is_none());
        assert_eq!(broker.fills().len(), 1);
    }
}
