// =============================================================================
// Volume-Weighted Average Price (VWAP): cumulative form
// =============================================================================
//
// VWAP weights every bar's typical price by its traded volume and accumulates
// from the first bar of the supplied series:
//
//   TP_i    = (H_i + L_i + C_i) / 3
//   VWAP_i  = Σ_{k<=i} (TP_k * V_k) / Σ_{k<=i} V_k
//
// The series is never windowed: row i always reflects every bar up to and
// including i, in arrival order.
// =============================================================================

use crate::market_data::Bar;

/// Compute the running VWAP for every bar (oldest first).
///
/// The output has the same length as `bars`. A row whose running volume sums
/// to zero (possible once negative volumes cancel out) has no defined VWAP and
/// comes out non-finite; callers treat that as a fault.
pub fn cumulative_vwap(bars: &[Bar]) -> Vec<f64> {
    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;

    bars.iter()
        .map(|bar| {
            cum_pv += bar.typical_price() * bar.volume;
            cum_vol += bar.volume;
            cum_pv / cum_vol
        })
        .collect()
}
