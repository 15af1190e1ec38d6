pub use crate::errors::{HarnessError, Result};
pub use crate::harness::{Harness, HarnessConfig, RunSummary, TestCase, TestResult};

pub mod battery;
pub mod cli;
pub mod errors;
pub mod harness;
