//! Plain-text report adapter.
//!
//! Renders a one-run summary for terminals and logs; richer presentation
//! belongs to an external dashboard reading the same `BacktestResult`.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradesentinelError;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn render(ticker: &str, result: &BacktestResult) -> String {
        let metrics = &result.metrics;
        let mut lines = Vec::new();

        let title = format!("tradesentinel backtest report - {}", ticker);
        lines.push(format!("{}\n{}\n", title, "=".repeat(title.len())));
        lines.push(format!(
            "Total Return:  {:>10.2}%",
            metrics.total_return * 100.0
        ));
        lines.push(format!("CAGR:          {:>10.2}%", metrics.cagr * 100.0));
        lines.push(format!("Sharpe Ratio:  {:>10.2}", metrics.sharpe_ratio));
        lines.push(format!(
            "Max Drawdown:  {:>10.2}%",
            metrics.max_drawdown * 100.0
        ));
        lines.push(format!("Turnover:      {:>10.2}x", metrics.turnover));
        lines.push(format!(
            "Trades:        {:>10} ({:.1}% win rate)",
            metrics.num_trades,
            metrics.win_rate * 100.0
        ));

        if !result.trades.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "{:<12} {:<12} {:>10} {:>10} {:>12} {:>12}",
                "entry", "exit", "entry_px", "exit_px", "shares", "pnl"
            ));
            for trade in &result.trades {
                lines.push(format!(
                    "{:<12} {:<12} {:>10.2} {:>10.2} {:>12.4} {:>12.2}",
                    trade.entry_date.to_string(),
                    trade.exit_date.to_string(),
                    trade.entry_price,
                    trade.exit_price,
                    trade.shares,
                    trade.pnl
                ));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        ticker: &str,
        result: &BacktestResult,
        output_path: &Path,
    ) -> Result<(), TradesentinelError> {
        std::fs::write(output_path, Self::render(ticker, result))?;
        Ok(())
    }
}
