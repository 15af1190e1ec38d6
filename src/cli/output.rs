//! Handles all user-facing output for the check runner.
//!
//! Every line of the report is produced here: banner, section headers, the
//! streaming per-check progress line and the summary block. Everything
//! writes to a `WriteColor` so the same code drives a colored terminal and
//! a plain in-memory buffer in tests.

use crate::harness::{RunSummary, TestResult};
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Width of the `=` and `-` rules framing the report.
pub const RULE_WIDTH: usize = 70;

// ============================================================================
// RUN HEADER
// ============================================================================

/// Prints the suite banner followed by the run timestamp.
pub fn print_banner<W: WriteColor>(out: &mut W, title: &str, timestamp: &str) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "  {}", title)?;
    out.reset()?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "\n📋 Test Run: {}\n", timestamp)
}

/// Prints a section title and its underline. Sections after the first are
/// separated from the previous one by a blank line.
pub fn print_section_header<W: WriteColor>(out: &mut W, title: &str, first: bool) -> io::Result<()> {
    if !first {
        writeln!(out)?;
    }
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "{}", title)?;
    out.reset()?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

// ============================================================================
// PER-CHECK PROGRESS
// ============================================================================

/// Prints the in-progress half of a check line and flushes it, so the name
/// is visible while the command runs.
pub fn print_progress<W: WriteColor>(out: &mut W, name: &str) -> io::Result<()> {
    write!(out, "🧪 {}... ", name)?;
    out.flush()
}

/// Completes a check line with its marker.
pub fn print_outcome<W: WriteColor>(out: &mut W, passed: bool) -> io::Result<()> {
    let (color, marker) = if passed {
        (Color::Green, "✅ PASS")
    } else {
        (Color::Red, "❌ FAIL")
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", marker)?;
    out.reset()?;
    writeln!(out)?;
    out.flush()
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Prints the summary block: counts, then either every failing check with
/// its expectation and captured output, or the success banner and notes.
pub fn print_summary<W: WriteColor>(
    out: &mut W,
    summary: &RunSummary,
    results: &[TestResult],
    success_notes: &[String],
) -> io::Result<()> {
    let total = summary.total();

    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "SUMMARY")?;
    out.reset()?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(out, "\n✅ PASSED: {}/{}", summary.passed, total)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    writeln!(out, "❌ FAILED: {}/{}", summary.failed, total)?;
    out.reset()?;

    if summary.all_passed() {
        print_success(out, success_notes)?;
    } else {
        print_failures(out, results)?;
    }

    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    out.flush()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_failures<W: WriteColor>(out: &mut W, results: &[TestResult]) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "\n⚠️  FAILED TESTS:")?;
    out.reset()?;
    for result in results.iter().filter(|r| !r.passed) {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(out, "\n  ❌ {}", result.name)?;
        out.reset()?;
        writeln!(out, "     Expected: {}", result.expected)?;
        writeln!(out, "     Got: {}", result.actual)?;
    }
    Ok(())
}

fn print_success<W: WriteColor>(out: &mut W, notes: &[String]) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(out, "\n🎉 ALL TESTS PASSED!")?;
    out.reset()?;
    if !notes.is_empty() {
        writeln!(out)?;
        for line in notes {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
