//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{BacktestConfig, run_backtest};
use crate::domain::config_validation::{validate_backtest_config, validate_indicator_config};
use crate::domain::error::TradesentinelError;
use crate::domain::indicator::{IndicatorFrame, IndicatorParams, bollinger, rsi};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "tradesentinel",
    about = "Volatility-aware trend strategy backtester"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data coverage and latest indicator readings
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            ticker,
            output,
        } => run_backtest_command(&config, ticker.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        volatility_threshold: adapter.get_double("backtest", "volatility_threshold", 0.40),
        transaction_cost_bps: adapter.get_double("backtest", "transaction_cost_bps", 5.0),
        periods_per_year: adapter
            .get_int("backtest", "periods_per_year", 252)
            .clamp(0, i64::from(u32::MAX)) as u32,
        initial_cash: adapter.get_double("backtest", "initial_cash", 100_000.0),
    }
}

pub fn build_indicator_params(adapter: &dyn ConfigPort) -> IndicatorParams {
    IndicatorParams {
        fast_window: adapter.get_int("indicators", "fast_window", 21).max(0) as usize,
        slow_window: adapter.get_int("indicators", "slow_window", 55).max(0) as usize,
        volatility_window: adapter.get_int("indicators", "volatility_window", 21).max(0) as usize,
    }
}

pub fn build_date_range(
    adapter: &dyn ConfigPort,
) -> Result<(NaiveDate, NaiveDate), TradesentinelError> {
    let parse = |key: &str| -> Result<NaiveDate, TradesentinelError> {
        let value = adapter.require_string("backtest", key)?;
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
            TradesentinelError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        })
    };
    Ok((parse("start_date")?, parse("end_date")?))
}

fn run_backtest_command(
    config_path: &Path,
    ticker_override: Option<&str>,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_indicator_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let (start_date, end_date) = match build_date_range(&adapter) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let ticker = match ticker_override {
        Some(t) => t.to_string(),
        None => match adapter.get_string("backtest", "ticker") {
            Some(t) => t,
            None => {
                eprintln!("error: ticker is required");
                return ExitCode::from(2);
            }
        },
    };

    let csv_dir = match adapter.require_string("data", "csv_dir") {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvDataAdapter::new(&csv_dir);
    let params = build_indicator_params(&adapter);
    let bt_config = build_backtest_config(&adapter);

    run_backtest_pipeline(
        &data_port,
        &ticker,
        start_date,
        end_date,
        params,
        &bt_config,
        output_path,
    )
}

/// Data-port-dependent half of the backtest command: fetch, compute
/// indicators, run the engine, render the report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    ticker: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    params: IndicatorParams,
    bt_config: &BacktestConfig,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!("Fetching {ticker} bars from {start_date} to {end_date}");
    let bars = match data_port.fetch_ohlcv(ticker, start_date, end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} bars loaded", bars.len());

    let frame = match IndicatorFrame::compute(&bars, params) {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let result = match run_backtest(&bars, &frame, bt_config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{}", TextReportAdapter::render(ticker, &result));

    if let Some(path) = output_path {
        if let Err(e) = TextReportAdapter.write(ticker, &result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let checks = [
        validate_backtest_config(&adapter),
        validate_indicator_config(&adapter),
    ];
    for check in checks {
        if let Err(e) = check {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    println!("{}: configuration OK", config_path.display());
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let csv_dir = match adapter.require_string("data", "csv_dir") {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvDataAdapter::new(&csv_dir);

    let ticker = match ticker {
        Some(t) => t.to_string(),
        None => {
            return match data_port.list_tickers() {
                Ok(tickers) => {
                    for t in tickers {
                        println!("{t}");
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    (&e).into()
                }
            };
        }
    };

    match print_ticker_info(&data_port, &ticker) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_ticker_info(
    data_port: &dyn DataPort,
    ticker: &str,
) -> Result<(), TradesentinelError> {
    let (first, last, count) = data_port
        .data_range(ticker)?
        .ok_or_else(|| TradesentinelError::NoData {
            ticker: ticker.to_string(),
        })?;

    println!("{ticker}: {count} bars from {first} to {last}");

    let bars = data_port.fetch_ohlcv(ticker, first, last)?;
    if let Some(bar) = bars.last() {
        println!("  last close: {:.2}", bar.close);
    }

    let rsi_samples = rsi::calculate_rsi(&bars, 14);
    if let Some(sample) = rsi_samples.last().filter(|s| s.valid) {
        println!("  RSI(14):    {:.1}", sample.value);
    }

    let bands = bollinger::calculate_bollinger(&bars, 20, 2.0);
    if let Some(sample) = bands.last().filter(|s| s.valid) {
        println!(
            "  Bollinger(20, 2.0): {:.2} / {:.2} / {:.2}",
            sample.lower, sample.middle, sample.upper
        );
    }

    Ok(())
}
