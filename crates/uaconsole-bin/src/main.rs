// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! UAConsole - OPC UA server console browser.
//!
//! Binary entry point: parse arguments, initialize logging, run the
//! browse, and map fatal errors to exit codes.

mod browse;
mod cli;
mod error;
mod logging;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    if let Err(err) = browse::run(&cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(err.exit_code());
    }
}
