// =============================================================================
// Support / Resistance Levels
// =============================================================================
//
// Two tiers of levels are derived from the bar series:
//
//   major support    = min(L) over the whole series
//   major resistance = max(H) over the whole series
//   minor support    = trailing mean of L over the last 3 bars
//   minor resistance = trailing mean of H over the last 3 bars
//
// The major levels are global and identical on every row. The minor window
// shrinks at the start of the series instead of producing a gap.
// =============================================================================

use crate::market_data::Bar;

/// Trailing window used for the minor levels.
pub const MINOR_WINDOW: usize = 3;

/// Global floor and ceiling of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MajorLevels {
    pub support: f64,
    pub resistance: f64,
}

/// Compute the major levels. Returns `None` for an empty series.
pub fn major_levels(bars: &[Bar]) -> Option<MajorLevels> {
    let first = bars.first()?;
    let init = MajorLevels {
        support: first.low,
        resistance: first.high,
    };
    Some(bars.iter().fold(init, |acc, bar| MajorLevels {
        support: acc.support.min(bar.low),
        resistance: acc.resistance.max(bar.high),
    }))
}

/// Trailing mean over at most `window` values ending at each index.
///
/// The first `window - 1` outputs average over the values available so far
/// (minimum one), so the output always has the same length as `values`.
/// A `window` of zero is treated as one.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Minor support per row: 3-bar trailing mean of lows.
pub fn minor_support(bars: &[Bar]) -> Vec<f64> {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    trailing_mean(&lows, MINOR_WINDOW)
}

/// Minor resistance per row: 3-bar trailing mean of highs.
pub fn minor_resistance(bars: &[Bar]) -> Vec<f64> {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    trailing_mean(&highs, MINOR_WINDOW)
}
