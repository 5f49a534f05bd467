// =============================================================================
// Indicator Engine: bars in, most recent enriched row out
// =============================================================================
//
// Pure pipeline, no I/O and no shared state:
//
//   raw rows ─clean─▶ bars ─enrich─▶ enriched rows ─select─▶ ResultRow
//
// Every stage takes an immutable slice and returns a new sequence, so each
// one can be exercised on its own. Selection is by position in the cleaned
// sequence (arrival order), never by date.
// =============================================================================

use chrono::NaiveDateTime;
use tracing::debug;

use crate::indicators::{levels, strength, vwap};
use crate::market_data::{Bar, RawBar};
use crate::types::Signal;

/// Trailing window for the average-volume column.
const AVG_VOLUME_WINDOW: usize = 2;

/// A bar with every derived column attached.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBar {
    pub bar: Bar,
    pub typical_price: f64,
    pub vwap: f64,
    pub avg_price: f64,
    pub avg_volume: f64,
    pub major_support: f64,
    pub major_resistance: f64,
    pub minor_support: f64,
    pub minor_resistance: f64,
    pub strength: f64,
    pub signal: Signal,
    pub signal_explanation: &'static str,
    pub entry_point: Option<f64>,
}

/// The single row the engine exposes to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub date: NaiveDateTime,
    pub vwap: f64,
    pub signal: Signal,
    pub signal_explanation: &'static str,
    pub entry_point: Option<f64>,
    pub major_support: f64,
    pub major_resistance: f64,
    pub minor_support: f64,
    pub minor_resistance: f64,
}

impl From<&EnrichedBar> for ResultRow {
    fn from(row: &EnrichedBar) -> Self {
        Self {
            date: row.bar.date,
            vwap: row.vwap,
            signal: row.signal,
            signal_explanation: row.signal_explanation,
            entry_point: row.entry_point,
            major_support: row.major_support,
            major_resistance: row.major_resistance,
            minor_support: row.minor_support,
            minor_resistance: row.minor_resistance,
        }
    }
}

impl ResultRow {
    /// True when every numeric field that is present is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.vwap,
            self.major_support,
            self.major_resistance,
            self.minor_support,
            self.minor_resistance,
        ]
        .iter()
        .chain(self.entry_point.iter())
        .all(|v| v.is_finite())
    }
}

/// Drop rows with a missing price or volume, or zero volume.
pub fn clean(rows: &[RawBar]) -> Vec<Bar> {
    rows.iter().filter_map(RawBar::to_bar).collect()
}

/// Attach every derived column to an already-clean series.
pub fn enrich(bars: &[Bar]) -> Vec<EnrichedBar> {
    let Some(major) = levels::major_levels(bars) else {
        return Vec::new();
    };

    let vwaps = vwap::cumulative_vwap(bars);
    let minor_support = levels::minor_support(bars);
    let minor_resistance = levels::minor_resistance(bars);
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let avg_volume = levels::trailing_mean(&volumes, AVG_VOLUME_WINDOW);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let vwap = vwaps[i];
            let signal = Signal::classify(bar.close, vwap);
            EnrichedBar {
                bar: bar.clone(),
                typical_price: bar.typical_price(),
                vwap,
                avg_price: bar.avg_price(),
                avg_volume: avg_volume[i],
                major_support: major.support,
                major_resistance: major.resistance,
                minor_support: minor_support[i],
                minor_resistance: minor_resistance[i],
                strength: strength::bar_strength(bar),
                signal,
                signal_explanation: signal.explanation(),
                entry_point: signal.is_directional().then_some(vwap),
            }
        })
        .collect()
}

/// Run the full pipeline and return the last row, or `None` when nothing
/// survives cleaning.
pub fn compute(rows: &[RawBar]) -> Option<ResultRow> {
    let bars = clean(rows);
    if bars.is_empty() {
        debug!(received = rows.len(), "no usable bars after cleaning");
        return None;
    }

    let enriched = enrich(&bars);
    let last = enriched.last()?;

    debug!(
        received = rows.len(),
        retained = bars.len(),
        signal = %last.signal,
        vwap = last.vwap,
        strength = last.strength,
        avg_price = last.avg_price,
        avg_volume = last.avg_volume,
        typical_price = last.typical_price,
        "indicator pipeline complete"
    );

    Some(ResultRow::from(last))
}
