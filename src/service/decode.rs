// =============================================================================
// CSV payload decoding
// =============================================================================
//
// The payload is a header row plus one row per bar. Required headers are
// `date, open, high, low, close, volume`, matched exactly; order does not
// matter and extra columns are ignored.
//
// Numeric cells that are empty or spelled as a missing value decode to `None`
// and are left to the engine's cleaning stage. Anything else that fails to
// parse rejects the whole payload, as does any unparseable date.
// =============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::market_data::RawBar;
use crate::service::ServiceError;

/// Header names the payload must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Cell spellings treated as a missing numeric value.
const MISSING_VALUES: &[&str] = &["NA", "N/A", "NaN", "nan", "-nan", "null", "NULL", "None"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d"];

/// Column positions of the required headers.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, ServiceError> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| !headers.iter().any(|h| h == *name))
            .collect();
        if !missing.is_empty() {
            return Err(ServiceError::Decode(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let find = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
        Ok(Self {
            date: find("date"),
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close: find("close"),
            volume: find("volume"),
        })
    }
}

/// Parse a timestamp in any of the accepted layouts.
///
/// RFC 3339 values carrying an offset are normalised to UTC.
pub fn parse_date(cell: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_number(cell: &str, column: &str, line: u64) -> Result<Option<f64>, ServiceError> {
    if cell.is_empty() || MISSING_VALUES.contains(&cell) {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        ServiceError::Decode(format!(
            "line {line}: column '{column}' has non-numeric value '{cell}'"
        ))
    })
}

/// Decode a raw payload into rows, preserving arrival order.
pub fn decode_bars(raw: &[u8]) -> Result<Vec<RawBar>, ServiceError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ServiceError::Decode(format!("payload is not valid UTF-8: {e}")))?;

    // Short rows are accepted: absent trailing cells read as missing values.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ServiceError::Decode(format!("unreadable header row: {e}")))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(ServiceError::Decode("payload has no header row".into()));
    }
    let cols = Columns::locate(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ServiceError::Decode(format!("malformed row: {e}")))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cell = |idx: usize| record.get(idx).unwrap_or_default();

        let date_cell = cell(cols.date);
        let date = parse_date(date_cell).ok_or_else(|| {
            ServiceError::Decode(format!("line {line}: unparseable date '{date_cell}'"))
        })?;

        rows.push(RawBar {
            date,
            open: parse_number(cell(cols.open), "open", line)?,
            high: parse_number(cell(cols.high), "high", line)?,
            low: parse_number(cell(cols.low), "low", line)?,
            close: parse_number(cell(cols.close), "close", line)?,
            volume: parse_number(cell(cols.volume), "volume", line)?,
        });
    }

    Ok(rows)
}
