//! Single-asset portfolio simulation.
//!
//! Walks price and position series in lockstep, fully invested or fully in
//! cash. On a flat→long transition the entire cash balance (minus the
//! proportional transaction cost) converts to fractional shares at that
//! bar's close; on long→flat the shares liquidate at the close with the
//! cost deducted from proceeds. Equity marks to the close on every bar.
//! A long run still open on the final bar is force-closed there, so the
//! trade log never carries a dangling position.

use chrono::NaiveDate;

use crate::domain::error::TradesentinelError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::position::{Position, Trade};

/// Portfolio snapshot after processing one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub date: NaiveDate,
    pub cash: f64,
    pub shares: f64,
    pub equity: f64,
}

/// Output of a full simulation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub states: Vec<PortfolioState>,
    pub trades: Vec<Trade>,
    /// Executed buy+sell notional divided by initial cash.
    pub turnover: f64,
}

struct OpenLot {
    entry_date: NaiveDate,
    entry_price: f64,
    entry_cost: f64,
    invested: f64,
}

struct Book {
    cash: f64,
    shares: f64,
    cost_rate: f64,
    executed_notional: f64,
    open: Option<OpenLot>,
    trades: Vec<Trade>,
}

impl Book {
    fn enter(&mut self, bar: &PriceBar) {
        let fee = self.cash * self.cost_rate;
        let stake = self.cash - fee;
        self.shares = stake / bar.close;
        self.executed_notional += stake;
        self.open = Some(OpenLot {
            entry_date: bar.date,
            entry_price: bar.close,
            entry_cost: fee,
            invested: self.cash,
        });
        self.cash = 0.0;
    }

    fn exit(&mut self, bar: &PriceBar) {
        let lot = match self.open.take() {
            Some(lot) => lot,
            None => return,
        };
        let gross = self.shares * bar.close;
        let fee = gross * self.cost_rate;
        let proceeds = gross - fee;
        self.executed_notional += gross;
        self.cash += proceeds;

        self.trades.push(Trade {
            entry_date: lot.entry_date,
            exit_date: bar.date,
            entry_price: lot.entry_price,
            exit_price: bar.close,
            shares: self.shares,
            cost: lot.entry_cost + fee,
            pnl: proceeds - lot.invested,
        });
        self.shares = 0.0;
    }
}

/// Simulate the position series against the bar series.
///
/// Fails eagerly on a length mismatch or on any non-positive or non-finite
/// close; a zero price would otherwise divide into NaN share counts and
/// corrupt every later state.
pub fn simulate(
    bars: &[PriceBar],
    positions: &[Position],
    initial_cash: f64,
    transaction_cost_bps: f64,
) -> Result<Simulation, TradesentinelError> {
    if bars.len() != positions.len() {
        return Err(TradesentinelError::ShapeMismatch {
            reason: format!(
                "{} price bars vs {} positions",
                bars.len(),
                positions.len()
            ),
        });
    }
    for bar in bars {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(TradesentinelError::InvalidPrice {
                date: bar.date,
                value: bar.close,
            });
        }
    }

    let mut book = Book {
        cash: initial_cash,
        shares: 0.0,
        cost_rate: transaction_cost_bps / 10_000.0,
        executed_notional: 0.0,
        open: None,
        trades: Vec::new(),
    };
    let mut states = Vec::with_capacity(bars.len());
    let mut prev = Position::Flat;

    for (i, bar) in bars.iter().enumerate() {
        let pos = positions[i];
        match (prev, pos) {
            (Position::Flat, Position::Long) => book.enter(bar),
            (Position::Long, Position::Flat) => book.exit(bar),
            _ => {}
        }

        // No dangling lot: whatever is still held on the last bar closes there.
        if i + 1 == bars.len() && book.open.is_some() {
            book.exit(bar);
        }

        states.push(PortfolioState {
            date: bar.date,
            cash: book.cash,
            shares: book.shares,
            equity: book.cash + book.shares * bar.close,
        });
        prev = pos;
    }

    Ok(Simulation {
        states,
        trades: book.trades,
        turnover: book.executed_notional / initial_cash,
    })
}
