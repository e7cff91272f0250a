//! Daily OHLCV bar representation.
//!
//! The engine consumes an already-validated series: ascending unique dates,
//! one bar per trading day the source had. The ingestion adapter is
//! responsible for producing that ordering; [`strictly_ascending`] lets
//! callers assert it.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// True when every date is strictly greater than its predecessor.
pub fn strictly_ascending(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn ascending_series_passes() {
        let bars = vec![
            bar("2024-01-15", 100.0),
            bar("2024-01-16", 101.0),
            bar("2024-01-17", 99.0),
        ];
        assert!(strictly_ascending(&bars));
    }

    #[test]
    fn duplicate_date_fails() {
        let bars = vec![bar("2024-01-15", 100.0), bar("2024-01-15", 101.0)];
        assert!(!strictly_ascending(&bars));
    }

    #[test]
    fn out_of_order_fails() {
        let bars = vec![bar("2024-01-16", 100.0), bar("2024-01-15", 101.0)];
        assert!(!strictly_ascending(&bars));
    }

    #[test]
    fn empty_and_single_are_trivially_ascending() {
        assert!(strictly_ascending(&[]));
        assert!(strictly_ascending(&[bar("2024-01-15", 100.0)]));
    }
}
