//! Summary performance statistics.
//!
//! Computed once from the final equity curve and trade log; every
//! degenerate case (constant equity, empty trade log, single-bar curve)
//! resolves to 0 rather than NaN or infinity so downstream consumers never
//! see a poisoned value.

use crate::domain::portfolio::PortfolioState;
use crate::domain::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub cagr: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub turnover: f64,
    pub num_trades: usize,
    pub win_rate: f64,
}

impl Metrics {
    pub fn compute(
        states: &[PortfolioState],
        trades: &[Trade],
        turnover: f64,
        periods_per_year: u32,
    ) -> Self {
        let equity: Vec<f64> = states.iter().map(|s| s.equity).collect();

        let first = equity.first().copied().unwrap_or(0.0);
        let last = equity.last().copied().unwrap_or(0.0);

        let total_return = if first > 0.0 { last / first - 1.0 } else { 0.0 };

        let n_periods = equity.len().saturating_sub(1);
        let cagr = if n_periods > 0 && first > 0.0 {
            (last / first).powf(periods_per_year as f64 / n_periods as f64) - 1.0
        } else {
            0.0
        };

        let sharpe_ratio = compute_sharpe(&equity, periods_per_year);
        let max_drawdown = compute_drawdown(&equity);

        let num_trades = trades.len();
        let wins = trades.iter().filter(|t| t.pnl > 0.0).count();
        let win_rate = if num_trades > 0 {
            wins as f64 / num_trades as f64
        } else {
            0.0
        };

        Metrics {
            total_return,
            cagr,
            sharpe_ratio,
            max_drawdown,
            turnover,
            num_trades,
            win_rate,
        }
    }
}

/// Annualized mean-over-stdev of simple period returns. Population stdev;
/// a constant curve has zero stdev and a Sharpe of 0 by definition.
fn compute_sharpe(equity: &[f64], periods_per_year: u32) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = equity
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        (mean / stddev) * (periods_per_year as f64).sqrt()
    } else {
        0.0
    }
}

/// Largest peak-to-trough decline as a fraction of the running peak.
fn compute_drawdown(equity: &[f64]) -> f64 {
    let mut peak = match equity.first() {
        Some(&e) => e,
        None => return 0.0,
    };
    let mut max_dd = 0.0_f64;

    for &value in equity {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_states(equity: &[f64]) -> Vec<PortfolioState> {
        equity
            .iter()
            .enumerate()
            .map(|(i, &e)| PortfolioState {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                cash: e,
                shares: 0.0,
                equity: e,
            })
            .collect()
    }

    fn make_trade(pnl: f64) -> Trade {
        let entry = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Trade {
            entry_date: entry,
            exit_date: entry + chrono::Duration::days(3),
            entry_price: 100.0,
            exit_price: 100.0 + pnl / 10.0,
            shares: 10.0,
            cost: 0.0,
            pnl,
        }
    }

    #[test]
    fn total_return_positive() {
        let states = make_states(&[1_000.0, 1_100.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!((metrics.total_return - 0.10).abs() < 1e-9);
    }

    #[test]
    fn total_return_negative() {
        let states = make_states(&[1_000.0, 900.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!((metrics.total_return - (-0.10)).abs() < 1e-9);
    }

    #[test]
    fn constant_equity_is_all_zeros() {
        let states = make_states(&[1_000.0; 10]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);

        assert!((metrics.total_return - 0.0).abs() < f64::EPSILON);
        assert!((metrics.cagr - 0.0).abs() < 1e-12);
        assert!((metrics.sharpe_ratio - 0.0).abs() < f64::EPSILON);
        assert!((metrics.max_drawdown - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cagr_annualizes_by_period_count() {
        // Doubling over exactly one trading year is a 100% CAGR.
        let mut equity = vec![0.0; 253];
        for (i, e) in equity.iter_mut().enumerate() {
            *e = 1_000.0 * (2.0_f64).powf(i as f64 / 252.0);
        }
        let states = make_states(&equity);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);

        assert!((metrics.cagr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cagr_compounds_over_multiple_years() {
        // Quadrupling over two trading years is still a 100% CAGR.
        let states = make_states_sparse(4_000.0, 505);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!((metrics.cagr - 1.0).abs() < 1e-9);
    }

    fn make_states_sparse(final_equity: f64, len: usize) -> Vec<PortfolioState> {
        let mut equity = vec![1_000.0; len];
        *equity.last_mut().unwrap() = final_equity;
        make_states(&equity)
    }

    #[test]
    fn single_point_curve_has_no_cagr() {
        let states = make_states(&[1_000.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!((metrics.cagr - 0.0).abs() < f64::EPSILON);
        assert!((metrics.sharpe_ratio - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sharpe_positive_for_steady_gains() {
        let equity: Vec<f64> = (0..100).map(|i| 1_000.0 * 1.001_f64.powi(i)).collect();
        let states = make_states(&equity);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!(metrics.sharpe_ratio > 0.0);
    }

    #[test]
    fn sharpe_hand_computed() {
        // Returns: +10%, -10% exactly.
        let states = make_states(&[1_000.0, 1_100.0, 990.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);

        let mean = (0.10 + (-0.10)) / 2.0;
        let variance = ((0.10_f64 - mean).powi(2) + (-0.10_f64 - mean).powi(2)) / 2.0;
        let expected = mean / variance.sqrt() * (252.0_f64).sqrt();
        assert!((metrics.sharpe_ratio - expected).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_hand_computed() {
        let states = make_states(&[100.0, 110.0, 90.0, 95.0, 80.0, 120.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!((metrics.max_drawdown - (110.0 - 80.0) / 110.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_zero_for_monotone_curve() {
        let states = make_states(&[100.0, 110.0, 120.0, 130.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!((metrics.max_drawdown - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn max_drawdown_total_loss_is_one() {
        let states = make_states(&[100.0, 0.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert!((metrics.max_drawdown - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_counts_positive_pnl_only() {
        let trades = vec![
            make_trade(50.0),
            make_trade(-20.0),
            make_trade(0.0),
            make_trade(10.0),
        ];
        let states = make_states(&[1_000.0, 1_040.0]);
        let metrics = Metrics::compute(&states, &trades, 0.0, 252);

        assert_eq!(metrics.num_trades, 4);
        assert!((metrics.win_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_trades_means_zero_win_rate() {
        let states = make_states(&[1_000.0, 1_000.0]);
        let metrics = Metrics::compute(&states, &[], 0.0, 252);
        assert_eq!(metrics.num_trades, 0);
        assert!((metrics.win_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn turnover_is_passed_through() {
        let states = make_states(&[1_000.0, 1_000.0]);
        let metrics = Metrics::compute(&states, &[], 2.5, 252);
        assert!((metrics.turnover - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_curve_is_all_zeros() {
        let metrics = Metrics::compute(&[], &[], 0.0, 252);
        assert!((metrics.total_return - 0.0).abs() < f64::EPSILON);
        assert!((metrics.max_drawdown - 0.0).abs() < f64::EPSILON);
        assert!((metrics.sharpe_ratio - 0.0).abs() < f64::EPSILON);
    }
}
