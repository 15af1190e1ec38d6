//! The checkrun Command-Line Interface.
//!
//! Parses arguments, runs the default battery against the current directory
//! and turns the outcome into the process exit code.

use crate::battery::default_battery;
use crate::harness::{Harness, HarnessConfig};
use clap::Parser;
use std::process;
use termcolor::StandardStream;

pub mod args;
pub mod output;

use args::CheckrunArgs;

/// The main entry point for the CLI. Exits with 0 only when every check
/// passed.
pub fn run() {
    let _args = CheckrunArgs::parse();

    let config = HarnessConfig::default();
    let stdout = StandardStream::stdout(config.color_choice());
    let mut harness = Harness::new(stdout, config);

    match harness.run_all(&default_battery()) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(1);
        }
    }
}
