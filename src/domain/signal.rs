//! Long/flat signal generation.
//!
//! Rule: long when the fast EMA is strictly above the slow EMA and annualized
//! volatility sits at or below the configured cap; flat otherwise. A tie
//! between the EMAs is no entry. The volatility filter is upper-bound only —
//! dead low-volatility regimes are not excluded (see the regime test below).
//!
//! Each signal reads only its own row, so no decision uses information from a
//! later bar.

use crate::domain::error::TradesentinelError;
use crate::domain::indicator::IndicatorFrame;

/// Desired exposure decided at a bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Long,
    Flat,
}

/// Derive one signal per indicator row.
///
/// Warm-up rows produce `Flat`. Fails when the frame is shorter than the
/// lookback its own parameters require, or when a non-warm-up row carries a
/// non-finite value (the indicator contract promises full coverage of every
/// evaluated timestamp).
pub fn generate_signals(
    frame: &IndicatorFrame,
    volatility_threshold: f64,
) -> Result<Vec<Signal>, TradesentinelError> {
    if frame.is_empty() {
        return Err(TradesentinelError::EmptyInput { what: "indicators" });
    }
    let need = frame.params.min_history();
    if frame.len() < need {
        return Err(TradesentinelError::InsufficientData {
            have: frame.len(),
            need,
        });
    }

    let mut signals = Vec::with_capacity(frame.len());
    for row in &frame.rows {
        if !row.valid {
            signals.push(Signal::Flat);
            continue;
        }
        if !row.ema_fast.is_finite() || !row.ema_slow.is_finite() || !row.volatility.is_finite()
        {
            return Err(TradesentinelError::ShapeMismatch {
                reason: format!("non-finite indicator value at {}", row.date),
            });
        }

        let trending = row.ema_fast > row.ema_slow;
        let calm = row.volatility <= volatility_threshold;
        signals.push(if trending && calm {
            Signal::Long
        } else {
            Signal::Flat
        });
    }

    Ok(signals)
}
