//! CSV file data adapter.
//!
//! One file per ticker under a base directory, named `{TICKER}.csv` with a
//! `date,open,high,low,close,volume` header. Rows are parsed, filtered to
//! the requested range, de-duplicated by date (first occurrence wins), and
//! sorted ascending — the validated-series contract the engine consumes.

use crate::domain::error::TradesentinelError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<PriceBar>, TradesentinelError> {
        let path = self.csv_path(ticker);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| TradesentinelError::Data {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TradesentinelError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            bars.push(parse_record(&record, &path)?);
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

fn get_field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    path: &Path,
) -> Result<&'r str, TradesentinelError> {
    record.get(idx).ok_or_else(|| TradesentinelError::Data {
        reason: format!("missing {} column in {}", name, path.display()),
    })
}

fn get_number(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    path: &Path,
) -> Result<f64, TradesentinelError> {
    get_field(record, idx, name, path)?
        .parse()
        .map_err(|e| TradesentinelError::Data {
            reason: format!("invalid {} value in {}: {}", name, path.display(), e),
        })
}

fn parse_record(
    record: &csv::StringRecord,
    path: &Path,
) -> Result<PriceBar, TradesentinelError> {
    let date = NaiveDate::parse_from_str(get_field(record, 0, "date", path)?, "%Y-%m-%d")
        .map_err(|e| TradesentinelError::Data {
            reason: format!("invalid date in {}: {}", path.display(), e),
        })?;
    let volume: i64 =
        get_field(record, 5, "volume", path)?
            .parse()
            .map_err(|e| TradesentinelError::Data {
                reason: format!("invalid volume value in {}: {}", path.display(), e),
            })?;

    Ok(PriceBar {
        date,
        open: get_number(record, 1, "open", path)?,
        high: get_number(record, 2, "high", path)?,
        low: get_number(record, 3, "low", path)?,
        close: get_number(record, 4, "close", path)?,
        volume,
    })
}

impl DataPort for CsvDataAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradesentinelError> {
        let bars: Vec<PriceBar> = self
            .read_all(ticker)?
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
        let entries =
            std::fs::read_dir(&self.base_path).map_err(|e| TradesentinelError::Data {
                reason: format!(
                    "failed to read directory {}: {}",
                    self.base_path.display(),
                    e
                ),
            })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TradesentinelError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                tickers.push(stem.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesentinelError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }
        let bars = self.read_all(ticker)?;
        Ok(bars
            .first()
            .zip(bars.last())
            .map(|(first, last)| (first.date, last.date, bars.len())))
    }
}
