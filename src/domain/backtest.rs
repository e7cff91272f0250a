//! Backtest engine entry point.
//!
//! `run_backtest` wires the stages together: signals from the indicator
//! frame, one-bar execution lag, portfolio simulation, then summary
//! metrics. Input contracts are checked eagerly before any stage runs. The
//! whole pipeline is a pure function of its inputs — re-running with the
//! same series and config yields an identical result, so interactive
//! callers may invoke it repeatedly with different configs.

use crate::domain::error::TradesentinelError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::{PriceBar, strictly_ascending};
use crate::domain::portfolio::{self, PortfolioState};
use crate::domain::position::{self, Position, Trade};
use crate::domain::signal::{self, Signal};

/// Parameter set for a single backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Annualized volatility cap; entries are suppressed above it.
    pub volatility_threshold: f64,
    /// Proportional cost per execution, in basis points of notional.
    pub transaction_cost_bps: f64,
    /// Bar frequency used for annualization (252 for daily bars).
    pub periods_per_year: u32,
    pub initial_cash: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            volatility_threshold: 0.40,
            transaction_cost_bps: 5.0,
            periods_per_year: 252,
            initial_cash: 100_000.0,
        }
    }
}

impl BacktestConfig {
    /// Sanity-check parameter values before a run.
    pub fn validate(&self) -> Result<(), TradesentinelError> {
        if !(self.volatility_threshold.is_finite() && self.volatility_threshold > 0.0) {
            return Err(invalid(
                "volatility_threshold",
                "must be a positive finite number",
            ));
        }
        if !(self.transaction_cost_bps.is_finite()
            && (0.0..=10_000.0).contains(&self.transaction_cost_bps))
        {
            return Err(invalid(
                "transaction_cost_bps",
                "must be between 0 and 10000",
            ));
        }
        if self.periods_per_year == 0 {
            return Err(invalid("periods_per_year", "must be positive"));
        }
        if !(self.initial_cash.is_finite() && self.initial_cash > 0.0) {
            return Err(invalid("initial_cash", "must be a positive finite number"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> TradesentinelError {
    TradesentinelError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Immutable bundle of everything one run produced. Owns all four series;
/// discarded wholesale when a new run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub signals: Vec<Signal>,
    pub positions: Vec<Position>,
    pub states: Vec<PortfolioState>,
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
}

impl BacktestResult {
    pub fn equity_curve(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s.equity)
    }
}

/// Run the full pipeline over an aligned price/indicator pair.
pub fn run_backtest(
    bars: &[PriceBar],
    indicators: &IndicatorFrame,
    config: &BacktestConfig,
) -> Result<BacktestResult, TradesentinelError> {
    config.validate()?;

    if bars.is_empty() {
        return Err(TradesentinelError::EmptyInput { what: "prices" });
    }
    if indicators.is_empty() {
        return Err(TradesentinelError::EmptyInput { what: "indicators" });
    }
    if !strictly_ascending(bars) {
        return Err(TradesentinelError::ShapeMismatch {
            reason: "price series dates are not strictly increasing".to_string(),
        });
    }
    check_alignment(bars, indicators)?;

    let signals = signal::generate_signals(indicators, config.volatility_threshold)?;
    let positions = position::lag_signals(&signals);
    let sim = portfolio::simulate(
        bars,
        &positions,
        config.initial_cash,
        config.transaction_cost_bps,
    )?;
    let metrics = Metrics::compute(&sim.states, &sim.trades, sim.turnover, config.periods_per_year);

    Ok(BacktestResult {
        signals,
        positions,
        states: sim.states,
        trades: sim.trades,
        metrics,
    })
}

fn check_alignment(
    bars: &[PriceBar],
    indicators: &IndicatorFrame,
) -> Result<(), TradesentinelError> {
    if bars.len() != indicators.len() {
        return Err(TradesentinelError::ShapeMismatch {
            reason: format!(
                "{} price bars vs {} indicator rows",
                bars.len(),
                indicators.len()
            ),
        });
    }
    for (bar, row) in bars.iter().zip(&indicators.rows) {
        if bar.date != row.date {
            return Err(TradesentinelError::ShapeMismatch {
                reason: format!(
                    "price bar {} paired with indicator row {}",
                    bar.date, row.date
                ),
            });
        }
    }
    Ok(())
}
