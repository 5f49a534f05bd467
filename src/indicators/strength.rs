// =============================================================================
// Bar Strength: body-to-range ratio
// =============================================================================
//
//   strength = |C - O| / (H - L) * 100      when H != L
//            = 0                            otherwise
//
// Bounded to [0, 100] for well-formed bars. A flat bar is exactly zero.

use crate::market_data::Bar;

/// Strength of a single bar, in percent.
pub fn bar_strength(bar: &Bar) -> f64 {
    let range = bar.range();
    if range == 0.0 {
        return 0.0;
    }
    bar.body() / range * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open,
            high,
            low,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn flat_bar_is_zero() {
        assert_eq!(bar_strength(&bar(100.0, 100.0, 100.0, 100.0)), 0.0);
    }

    #[test]
    fn full_body_is_hundred() {
        assert!((bar_strength(&bar(9.0, 12.0, 9.0, 12.0)) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn partial_body() {
        // |11 - 10| / (12 - 9) * 100
        let s = bar_strength(&bar(10.0, 12.0, 9.0, 11.0));
        assert!((s - 100.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn bearish_body_is_positive() {
        let s = bar_strength(&bar(12.0, 12.0, 8.0, 10.0));
        assert!((s - 50.0).abs() < 1e-12);
    }
}
