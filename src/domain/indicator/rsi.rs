//! Relative Strength Index with Wilder smoothing.
//!
//! Average gain/loss seeded with an SMA over the first `period` moves, then
//! avg[i] = avg[i-1]*(p-1)/p + move[i]/p. Warmup: first `period` bars are
//! invalid.

use crate::domain::indicator::IndicatorSample;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> Vec<IndicatorSample> {
    if period < 2 || bars.is_empty() {
        return Vec::new();
    }

    let mut samples = Vec::with_capacity(bars.len());
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            samples.push(warmup_sample(bar));
            continue;
        }

        let delta = bar.close - bars[i - 1].close;
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if i < period {
            gain_sum += gain;
            loss_sum += loss;
            samples.push(warmup_sample(bar));
            continue;
        }

        if i == period {
            gain_sum += gain;
            loss_sum += loss;
            avg_gain = gain_sum / period as f64;
            avg_loss = loss_sum / period as f64;
        } else {
            let p = period as f64;
            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        }

        let value = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        };

        samples.push(IndicatorSample {
            date: bar.date,
            valid: true,
            value,
        });
    }

    samples
}

fn warmup_sample(bar: &PriceBar) -> IndicatorSample {
    IndicatorSample {
        date: bar.date,
        valid: false,
        value: 0.0,
    }
}
