//! `bril-ssa` — convert a Bril program to SSA form.

use std::process;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::{fmt, EnvFilter};

use bril_ssa::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter =
        EnvFilter::from_default_env().add_directive(format!("bril_ssa={log_level}").parse().unwrap());

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .init();

    if let Err(err) = cli.run() {
        error!("{err}");
        for cause in err.chain().skip(1) {
            error!("  caused by: {cause}");
        }
        process::exit(1);
    }
}
