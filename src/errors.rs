//! Error types for the check runner.
//!
//! Command failures are not errors here: a non-zero exit or a missing
//! marker is an ordinary failing result. The only things that can go wrong
//! are spawning a child (folded back into a failing result by
//! [`crate::harness::run_command`]) and writing the report itself.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The shell could not be started or waited on.
    #[error("failed to run `{command}`: {source}")]
    #[diagnostic(
        code(checkrun::spawn),
        help("make sure the configured shell exists and is executable")
    )]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be written to its sink.
    #[error("failed to write report: {0}")]
    #[diagnostic(code(checkrun::report))]
    Report(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
