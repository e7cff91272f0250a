use clap::Parser;
use tradesentinel::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
