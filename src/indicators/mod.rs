// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free column computations over a clean bar series. Each
// function returns one value per input bar (or a single aggregate), so the
// engine can zip them back into enriched rows.

pub mod levels;
pub mod strength;
pub mod vwap;
