//! Technical indicator computation and the indicator input contract.
//!
//! The backtest engine does not compute indicators; it consumes an
//! [`IndicatorFrame`] aligned row-for-row with the price series. This module
//! is the collaborator that builds one: EMA pair plus annualized volatility
//! for the signal rule, RSI and Bollinger bands for inspection output.
//!
//! Warm-up rows carry `valid = false` and a zero value, mirroring the
//! lookback each indicator needs before its first defined sample.

pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod volatility;

use chrono::NaiveDate;

use crate::domain::error::TradesentinelError;
use crate::domain::ohlcv::PriceBar;

/// One sample of a single-valued indicator series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSample {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

/// Lookback windows for the indicator set the signal rule consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub fast_window: usize,
    pub slow_window: usize,
    pub volatility_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            fast_window: 21,
            slow_window: 55,
            volatility_window: 21,
        }
    }
}

impl IndicatorParams {
    /// Reject window combinations that cannot produce a meaningful crossover.
    pub fn validate(&self) -> Result<(), TradesentinelError> {
        if self.fast_window <= 1 {
            return Err(invalid("fast_window", "must be greater than 1"));
        }
        if self.slow_window <= self.fast_window {
            return Err(invalid(
                "slow_window",
                "must be strictly greater than fast_window",
            ));
        }
        if self.volatility_window <= 1 {
            return Err(invalid("volatility_window", "must be greater than 1"));
        }
        Ok(())
    }

    /// Bars required before every indicator column has a defined value.
    /// Volatility needs one extra bar for its first log return.
    pub fn min_history(&self) -> usize {
        self.slow_window.max(self.volatility_window + 1)
    }
}

fn invalid(key: &str, reason: &str) -> TradesentinelError {
    TradesentinelError::ConfigInvalid {
        section: "indicators".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// One aligned row of the indicator columns the signal rule reads.
/// `valid` is false while any column is still warming up.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub valid: bool,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub volatility: f64,
}

/// A date-aligned frame of indicator rows, one per price bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub params: IndicatorParams,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// Build the frame for a bar series. Fails when the series is shorter
    /// than the longest lookback the configured windows need.
    pub fn compute(
        bars: &[PriceBar],
        params: IndicatorParams,
    ) -> Result<Self, TradesentinelError> {
        params.validate()?;
        if bars.is_empty() {
            return Err(TradesentinelError::EmptyInput { what: "prices" });
        }
        let need = params.min_history();
        if bars.len() < need {
            return Err(TradesentinelError::InsufficientData {
                have: bars.len(),
                need,
            });
        }

        let fast = ema::calculate_ema(bars, params.fast_window);
        let slow = ema::calculate_ema(bars, params.slow_window);
        let vol = volatility::calculate_volatility(bars, params.volatility_window, 252);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                date: bar.date,
                valid: fast[i].valid && slow[i].valid && vol[i].valid,
                ema_fast: fast[i].value,
                ema_slow: slow[i].value,
                volatility: vol[i].value,
            })
            .collect();

        Ok(IndicatorFrame { params, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the frame covers exactly the same dates as `bars`.
    pub fn aligned_with(&self, bars: &[PriceBar]) -> bool {
        self.rows.len() == bars.len()
            && self
                .rows
                .iter()
                .zip(bars)
                .all(|(row, bar)| row.date == bar.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect()
    }

    fn small_params() -> IndicatorParams {
        IndicatorParams {
            fast_window: 2,
            slow_window: 3,
            volatility_window: 2,
        }
    }

    #[test]
    fn default_params_validate() {
        assert!(IndicatorParams::default().validate().is_ok());
    }

    #[test]
    fn fast_window_of_one_rejected() {
        let params = IndicatorParams {
            fast_window: 1,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            TradesentinelError::ConfigInvalid { key, .. } if key == "fast_window"
        ));
    }

    #[test]
    fn slow_must_exceed_fast() {
        let params = IndicatorParams {
            fast_window: 21,
            slow_window: 21,
            volatility_window: 21,
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            TradesentinelError::ConfigInvalid { key, .. } if key == "slow_window"
        ));
    }

    #[test]
    fn min_history_covers_volatility_lookback() {
        let params = IndicatorParams {
            fast_window: 5,
            slow_window: 10,
            volatility_window: 20,
        };
        assert_eq!(params.min_history(), 21);

        let params = IndicatorParams {
            fast_window: 21,
            slow_window: 55,
            volatility_window: 21,
        };
        assert_eq!(params.min_history(), 55);
    }

    #[test]
    fn compute_rejects_short_series() {
        let bars = make_bars(&[100.0, 101.0]);
        let err = IndicatorFrame::compute(&bars, small_params()).unwrap_err();
        assert!(matches!(
            err,
            TradesentinelError::InsufficientData { have: 2, need: 3 }
        ));
    }

    #[test]
    fn compute_rejects_empty_series() {
        let err = IndicatorFrame::compute(&[], small_params()).unwrap_err();
        assert!(matches!(err, TradesentinelError::EmptyInput { what: "prices" }));
    }

    #[test]
    fn frame_is_aligned_with_source_bars() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let frame = IndicatorFrame::compute(&bars, small_params()).unwrap();

        assert_eq!(frame.len(), bars.len());
        assert!(frame.aligned_with(&bars));
    }

    #[test]
    fn warmup_rows_are_invalid_then_valid() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let frame = IndicatorFrame::compute(&bars, small_params()).unwrap();

        // Slow EMA(3) defines from index 2; volatility(2) from index 2.
        assert!(!frame.rows[0].valid);
        assert!(!frame.rows[1].valid);
        assert!(frame.rows[2].valid);
        assert!(frame.rows[5].valid);
    }

    #[test]
    fn aligned_with_detects_date_drift() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0]);
        let mut frame = IndicatorFrame::compute(&bars, small_params()).unwrap();
        frame.rows[3].date = frame.rows[3].date + chrono::Duration::days(1);
        assert!(!frame.aligned_with(&bars));
    }
}
