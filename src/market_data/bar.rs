use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single validated OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub date: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One decoded input row before cleaning. Numeric fields are `None` when the
/// cell was empty or spelled as a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// Promote the row to a [`Bar`] if every price and the volume are present
    /// and finite, and the volume is nonzero.
    pub fn to_bar(&self) -> Option<Bar> {
        let present = |v: Option<f64>| v.filter(|x| x.is_finite());

        let volume = present(self.volume).filter(|v| *v != 0.0)?;
        Some(Bar {
            date: self.date,
            open: present(self.open)?,
            high: present(self.high)?,
            low: present(self.low)?,
            close: present(self.close)?,
            volume,
        })
    }
}

impl From<Bar> for RawBar {
    fn from(bar: Bar) -> Self {
        Self {
            date: bar.date,
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
            volume: Some(bar.volume),
        }
    }
}

impl Bar {
    /// Typical price `(high + low + close) / 3`.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Mean of the four price fields.
    pub fn avg_price(&self) -> f64 {
        (self.open + self.high + self.low + self.close) / 4.0
    }

    /// Full range of the bar.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Absolute distance between open and close.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }
}
