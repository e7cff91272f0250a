//! Domain error types.
//!
//! Every failure is detected eagerly at a stage boundary and propagated to
//! the caller unrecovered; the engine never substitutes defaults mid-run.

use chrono::NaiveDate;

/// Top-level error type for tradesentinel.
#[derive(Debug, thiserror::Error)]
pub enum TradesentinelError {
    #[error("insufficient history: have {have} bars, need at least {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("input shape mismatch: {reason}")]
    ShapeMismatch { reason: String },

    #[error("empty input: {what}")]
    EmptyInput { what: &'static str },

    #[error("invalid price {value} at {date}")]
    InvalidPrice { date: NaiveDate, value: f64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesentinelError> for std::process::ExitCode {
    fn from(err: &TradesentinelError) -> Self {
        let code: u8 = match err {
            TradesentinelError::Io(_) => 1,
            TradesentinelError::ConfigParse { .. }
            | TradesentinelError::ConfigMissing { .. }
            | TradesentinelError::ConfigInvalid { .. } => 2,
            TradesentinelError::NoData { .. } | TradesentinelError::Data { .. } => 3,
            TradesentinelError::InsufficientData { .. }
            | TradesentinelError::ShapeMismatch { .. }
            | TradesentinelError::EmptyInput { .. }
            | TradesentinelError::InvalidPrice { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
