//! Annualized historical volatility.
//!
//! Sample standard deviation of log returns over a rolling window, scaled by
//! sqrt(periods_per_year). Warmup: the first `window` bars are invalid (the
//! first log return only exists at index 1).

use crate::domain::indicator::IndicatorSample;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_volatility(
    bars: &[PriceBar],
    window: usize,
    periods_per_year: usize,
) -> Vec<IndicatorSample> {
    if window < 2 || bars.is_empty() {
        return Vec::new();
    }

    let mut log_returns = Vec::with_capacity(bars.len());
    log_returns.push(f64::NAN);
    for w in bars.windows(2) {
        log_returns.push((w[1].close / w[0].close).ln());
    }

    let annualize = (periods_per_year as f64).sqrt();
    let mut samples = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = i >= window;

        let value = if valid {
            let slice = &log_returns[i + 1 - window..=i];
            let mean: f64 = slice.iter().sum::<f64>() / window as f64;
            let variance: f64 = slice
                .iter()
                .map(|r| {
                    let diff = r - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (window as f64 - 1.0);
            variance.sqrt() * annualize
        } else {
            0.0
        };

        samples.push(IndicatorSample {
            date: bar.date,
            valid,
            value,
        });
    }

    samples
}
