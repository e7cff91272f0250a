#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use tradesentinel::domain::backtest::BacktestConfig;
use tradesentinel::domain::error::TradesentinelError;
use tradesentinel::domain::indicator::{IndicatorFrame, IndicatorParams, IndicatorRow};
pub use tradesentinel::domain::ohlcv::PriceBar;
use tradesentinel::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradesentinelError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(TradesentinelError::Data {
                reason: reason.clone(),
            });
        }
        let bars: Vec<PriceBar> = self
            .data
            .get(ticker)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        if bars.is_empty() {
            return Err(TradesentinelError::NoData {
                ticker: ticker.to_string(),
            });
        }
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TradesentinelError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesentinelError> {
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1_000,
    }
}

/// Daily bars starting 2024-01-01 with the given closes.
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        })
        .collect()
}

/// Linearly rising daily bars, one per calendar day.
pub fn generate_bars(start_day: &str, count: usize, start_price: f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_day, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1_000,
        })
        .collect()
}

pub fn tiny_params() -> IndicatorParams {
    IndicatorParams {
        fast_window: 2,
        slow_window: 3,
        volatility_window: 2,
    }
}

/// Frame whose rows force the given long/flat signal pattern under the
/// default 0.40 volatility cap.
pub fn frame_for_pattern(bars: &[PriceBar], long: &[bool]) -> IndicatorFrame {
    let rows = bars
        .iter()
        .zip(long)
        .map(|(bar, &go_long)| IndicatorRow {
            date: bar.date,
            valid: true,
            ema_fast: if go_long { 11.0 } else { 9.0 },
            ema_slow: 10.0,
            volatility: 0.10,
        })
        .collect();
    IndicatorFrame {
        params: tiny_params(),
        rows,
    }
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        volatility_threshold: 0.40,
        transaction_cost_bps: 0.0,
        periods_per_year: 252,
        initial_cash: 1_000.0,
    }
}

/// Write `{TICKER}.csv` in the data adapter's expected layout.
pub fn write_csv(dir: &Path, ticker: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    std::fs::write(dir.join(format!("{ticker}.csv")), content).unwrap();
}
