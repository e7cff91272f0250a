//! Report generation port trait — the seam to the presentation collaborator.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradesentinelError;
use std::path::Path;

/// Port for rendering backtest results; implementations only read the result.
pub trait ReportPort {
    fn write(
        &self,
        ticker: &str,
        result: &BacktestResult,
        output_path: &Path,
    ) -> Result<(), TradesentinelError>;
}
