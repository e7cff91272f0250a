//! Configuration validation.
//!
//! Checks every config field eagerly before any data is fetched, so a bad
//! run fails at startup instead of mid-pipeline.

use crate::domain::error::TradesentinelError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TradesentinelError> {
    config.require_string("data", "csv_dir")?;
    config.require_string("backtest", "ticker")?;
    validate_dates(config)?;
    validate_initial_cash(config)?;
    validate_transaction_cost(config)?;
    validate_periods_per_year(config)?;
    validate_volatility_threshold(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), TradesentinelError> {
    let fast = config.get_int("indicators", "fast_window", 21);
    let slow = config.get_int("indicators", "slow_window", 55);
    let vol = config.get_int("indicators", "volatility_window", 21);

    if fast <= 1 {
        return Err(invalid("indicators", "fast_window", "must be greater than 1"));
    }
    if slow <= fast {
        return Err(invalid(
            "indicators",
            "slow_window",
            "must be strictly greater than fast_window",
        ));
    }
    if vol <= 1 {
        return Err(invalid(
            "indicators",
            "volatility_window",
            "must be greater than 1",
        ));
    }
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), TradesentinelError> {
    let value = config.get_double("backtest", "initial_cash", 100_000.0);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid("backtest", "initial_cash", "must be positive"));
    }
    Ok(())
}

fn validate_transaction_cost(config: &dyn ConfigPort) -> Result<(), TradesentinelError> {
    let value = config.get_double("backtest", "transaction_cost_bps", 5.0);
    if !(value.is_finite() && (0.0..=10_000.0).contains(&value)) {
        return Err(invalid(
            "backtest",
            "transaction_cost_bps",
            "must be between 0 and 10000",
        ));
    }
    Ok(())
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), TradesentinelError> {
    let value = config.get_int("backtest", "periods_per_year", 252);
    if value <= 0 {
        return Err(invalid("backtest", "periods_per_year", "must be positive"));
    }
    Ok(())
}

fn validate_volatility_threshold(config: &dyn ConfigPort) -> Result<(), TradesentinelError> {
    let value = config.get_double("backtest", "volatility_threshold", 0.40);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            "backtest",
            "volatility_threshold",
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TradesentinelError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;
    if start >= end {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, TradesentinelError> {
    let value = config.require_string("backtest", key)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        invalid(
            "backtest",
            key,
            "invalid date format (expected YYYY-MM-DD)",
        )
    })
}

fn invalid(section: &str, key: &str, reason: &str) -> TradesentinelError {
    TradesentinelError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
