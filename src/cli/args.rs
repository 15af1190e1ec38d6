//! Defines the command-line arguments for the checkrun CLI.
//!
//! The runner takes no options of its own: the battery is fixed. `clap`
//! still supplies `--help` and `--version`.

use clap::Parser;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "checkrun",
    version,
    about = "Runs the project's fixed battery of layout checks and reports pass/fail."
)]
pub struct CheckrunArgs {}
