//! Data access port trait — the seam to the ingestion collaborator.
//!
//! Implementations must return a validated series: de-duplicated,
//! ascending-date-ordered, one bar per trading day the source had.

use crate::domain::error::TradesentinelError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradesentinelError>;

    fn list_tickers(&self) -> Result<Vec<String>, TradesentinelError>;

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesentinelError>;
}
