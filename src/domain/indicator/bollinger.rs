//! Bollinger bands.
//!
//! Rolling SMA of closes ± mult × sample standard deviation over the same
//! window. Warmup: first (n-1) bars are invalid.

use chrono::NaiveDate;

use crate::domain::ohlcv::PriceBar;

/// One sample of the three-band series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSample {
    pub date: NaiveDate,
    pub valid: bool,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn calculate_bollinger(
    bars: &[PriceBar],
    window: usize,
    mult: f64,
) -> Vec<BollingerSample> {
    if window < 2 || bars.is_empty() {
        return Vec::new();
    }

    let warmup = window - 1;
    let mut samples = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = i >= warmup;

        let (upper, middle, lower) = if valid {
            let slice = &bars[i + 1 - window..=i];
            let mean: f64 = slice.iter().map(|b| b.close).sum::<f64>() / window as f64;
            let variance: f64 = slice
                .iter()
                .map(|b| {
                    let diff = b.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (window as f64 - 1.0);
            let band = mult * variance.sqrt();
            (mean + band, mean, mean - band)
        } else {
            (0.0, 0.0, 0.0)
        };

        samples.push(BollingerSample {
            date: bar.date,
            valid,
            upper,
            middle,
            lower,
        });
    }

    samples
}
