//! Check Runner Harness
//!
//! Runs named shell commands one at a time, decides pass/fail by looking for
//! an expected marker in their combined output, and streams a report while it
//! goes.
//!
//! # Execution model
//!
//! 1. **Invoke**: run the command through `sh -c`, inheriting the working
//!    directory and environment, and capture stdout, stderr and exit code.
//! 2. **Evaluate**: a non-empty expectation passes when it occurs anywhere in
//!    stdout followed by stderr; an empty expectation passes on exit code 0.
//! 3. **Record**: store one [`TestResult`] per check, in execution order, with
//!    the captured output truncated for display only.
//! 4. **Report**: print the check line as soon as its outcome is known, and a
//!    summary once the battery is exhausted.
//!
//! A command that cannot even be started is not an error for the caller: it
//! becomes a failing result whose captured stderr describes the fault.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use checkrun::battery::default_battery;
//! use checkrun::harness::{Harness, HarnessConfig};
//! use termcolor::{ColorChoice, StandardStream};
//!
//! let mut harness = Harness::new(StandardStream::stdout(ColorChoice::Auto), HarnessConfig::default());
//! let all_passed = harness.run_all(&default_battery()).unwrap_or(false);
//! std::process::exit(if all_passed { 0 } else { 1 });
//! ```

use crate::battery::Battery;
use crate::cli::output;
use crate::errors::{HarnessError, Result};
use chrono::{DateTime, Local};
use std::process::{Command, ExitStatus};
use termcolor::{ColorChoice, WriteColor};
use tracing::{debug, info, warn};

/// Number of characters of captured output kept on a [`TestResult`].
pub const DEFAULT_OUTPUT_CAP: usize = 100;

/// Shell used to interpret each check's command line.
pub const DEFAULT_SHELL: &str = "sh";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// CORE TYPES
// =============================================================================

/// A named command and the marker its output must contain.
///
/// An empty `expected` means "only check that the command exits with 0".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub command: String,
    pub expected: String,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            expected: expected.into(),
        }
    }
}

/// Outcome of one check. `actual` holds at most `output_cap` characters of
/// the combined output; `passed` was decided on the full output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub command: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// Everything captured from one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }

    fn fault(err: &HarnessError) -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: err.to_string(),
        }
    }
}

/// Pass/fail counts derived from the recorded results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Settings for a harness run. There is no config file; callers build this
/// directly or take the defaults.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub use_colors: bool,
    pub output_cap: usize,
    pub shell: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
            output_cap: DEFAULT_OUTPUT_CAP,
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Color choice for a `termcolor` stream honoring `use_colors`.
    pub fn color_choice(&self) -> ColorChoice {
        if self.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Runs `command` through the default shell. Never fails: see
/// [`run_command_with`].
pub fn run_command(command: &str) -> CommandOutput {
    run_command_with(DEFAULT_SHELL, command)
}

/// Runs `command` as `<shell> -c <command>` and waits for it to finish.
///
/// A non-zero exit is a normal outcome. If the child cannot be spawned the
/// fault is folded into the returned value as exit code 1, empty stdout and
/// the fault description on stderr.
pub fn run_command_with(shell: &str, command: &str) -> CommandOutput {
    match spawn_shell(shell, command) {
        Ok(output) => output,
        Err(err) => {
            warn!(%command, error = %err, "command could not be run");
            CommandOutput::fault(&err)
        }
    }
}

fn spawn_shell(shell: &str, command: &str) -> Result<CommandOutput> {
    let output = Command::new(shell)
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| HarnessError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let exit_code = exit_code(output.status);
    debug!(%command, exit_code, "command finished");

    Ok(CommandOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Exit code of a finished child; a child killed by a signal reports
/// `-signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    1
}

// =============================================================================
// EVALUATION
// =============================================================================

/// The pass predicate. Always looks at the full combined output.
pub fn passes(expected: &str, output: &CommandOutput) -> bool {
    if expected.is_empty() {
        output.exit_code == 0
    } else {
        output.combined().contains(expected)
    }
}

/// First `cap` characters of `text`.
pub fn truncate_output(text: &str, cap: usize) -> String {
    text.chars().take(cap).collect()
}

// =============================================================================
// HARNESS
// =============================================================================

/// One run of the harness. Owns its results and counters; build a fresh one
/// per run.
pub struct Harness<W: WriteColor> {
    config: HarnessConfig,
    out: W,
    started_at: DateTime<Local>,
    results: Vec<TestResult>,
    passed: usize,
    failed: usize,
    sections_shown: usize,
    success_notes: Vec<String>,
}

impl<W: WriteColor> Harness<W> {
    pub fn new(out: W, config: HarnessConfig) -> Self {
        Self {
            config,
            out,
            started_at: Local::now(),
            results: Vec::new(),
            passed: 0,
            failed: 0,
            sections_shown: 0,
            success_notes: Vec::new(),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Results recorded so far, in execution order.
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            passed: self.passed,
            failed: self.failed,
        }
    }

    /// Run timestamp as printed in the banner.
    pub fn timestamp(&self) -> String {
        self.started_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Consumes the harness and hands back the report sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Prints a section header. Sections only group the report visually.
    pub fn section(&mut self, title: &str) -> Result<()> {
        output::print_section_header(&mut self.out, title, self.sections_shown == 0)?;
        self.sections_shown += 1;
        Ok(())
    }

    /// Runs one check, records its result and prints its line.
    pub fn evaluate(&mut self, name: &str, command: &str, expected: &str) -> Result<TestResult> {
        output::print_progress(&mut self.out, name)?;

        let outcome = run_command_with(&self.config.shell, command);
        let passed = passes(expected, &outcome);
        let result = TestResult {
            name: name.to_string(),
            command: command.to_string(),
            expected: expected.to_string(),
            actual: truncate_output(&outcome.combined(), self.config.output_cap),
            passed,
        };

        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result.clone());

        output::print_outcome(&mut self.out, passed)?;
        Ok(result)
    }

    pub fn evaluate_case(&mut self, case: &TestCase) -> Result<TestResult> {
        self.evaluate(&case.name, &case.command, &case.expected)
    }

    /// Runs every check of `battery` in order, then prints the summary.
    /// Returns whether every check passed.
    pub fn run_all(&mut self, battery: &Battery) -> Result<bool> {
        info!(suite = %battery.title, checks = battery.len(), "starting run");
        self.success_notes = battery.success_notes.clone();

        let timestamp = self.timestamp();
        output::print_banner(&mut self.out, &battery.title, &timestamp)?;

        for section in &battery.sections {
            self.section(&section.title)?;
            for case in &section.cases {
                self.evaluate_case(case)?;
            }
        }

        self.print_summary()
    }

    /// Prints counts and failure details (or the success banner). Returns
    /// whether no check failed.
    pub fn print_summary(&mut self) -> Result<bool> {
        let summary = self.summary();
        output::print_summary(&mut self.out, &summary, &self.results, &self.success_notes)?;
        info!(
            passed = summary.passed,
            failed = summary.failed,
            total = summary.total(),
            "run finished"
        );
        Ok(summary.all_passed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::Section;
    use termcolor::Buffer;

    fn quiet_config() -> HarnessConfig {
        HarnessConfig {
            use_colors: false,
            ..HarnessConfig::default()
        }
    }

    fn harness() -> Harness<Buffer> {
        Harness::new(Buffer::no_color(), quiet_config())
    }

    fn report(harness: Harness<Buffer>) -> String {
        String::from_utf8(harness.into_output().into_inner()).unwrap()
    }

    #[test]
    fn test_substring_in_stdout_passes() {
        let mut h = harness();
        let result = h.evaluate("echo", "echo hello world", "hello").unwrap();
        assert!(result.passed);
        assert_eq!(result.actual, "hello world\n");
    }

    #[test]
    fn test_empty_expectation_fails_on_nonzero_exit() {
        let mut h = harness();
        assert!(!h.evaluate("exit", "exit 1", "").unwrap().passed);
    }

    #[test]
    fn test_empty_expectation_passes_on_zero_exit() {
        let mut h = harness();
        assert!(h.evaluate("true", "true", "").unwrap().passed);
        assert!(h.evaluate("noisy", "echo anything", "").unwrap().passed);
    }

    #[test]
    fn test_missing_marker_fails_and_keeps_output() {
        let mut h = harness();
        let result = h.evaluate("nope", "echo nope", "yes").unwrap();
        assert!(!result.passed);
        assert_eq!(result.expected, "yes");
        assert_eq!(result.actual, "nope\n");
    }

    #[test]
    fn test_marker_passes_regardless_of_exit_code() {
        let mut h = harness();
        assert!(h.evaluate("fails loudly", "echo ok; exit 3", "ok").unwrap().passed);
    }

    #[test]
    fn test_marker_found_in_stderr() {
        let mut h = harness();
        assert!(h.evaluate("stderr", "echo oops >&2", "oops").unwrap().passed);
    }

    #[test]
    fn test_combined_output_is_stdout_then_stderr() {
        let output = run_command("echo err >&2; echo out");
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.combined(), "out\nerr\n");
    }

    #[test]
    fn test_truncation_does_not_affect_predicate() {
        let mut h = harness();
        let result = h
            .evaluate("late marker", "printf '%0120dMARK' 0", "MARK")
            .unwrap();
        assert!(result.passed);
        assert_eq!(result.actual.chars().count(), DEFAULT_OUTPUT_CAP);
        assert!(!result.actual.contains("MARK"));
    }

    #[test]
    fn test_truncate_output_counts_characters() {
        let text = "é".repeat(150);
        let truncated = truncate_output(&text, 100);
        assert_eq!(truncated.chars().count(), 100);
        assert_eq!(truncate_output("short", 100), "short");
    }

    #[test]
    fn test_spawn_fault_becomes_failing_result() {
        let output = run_command_with("/nonexistent/checkrun-shell", "true");
        assert_eq!(output.exit_code, 1);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.contains("failed to run `true`"));

        let mut h = Harness::new(
            Buffer::no_color(),
            HarnessConfig {
                shell: "/nonexistent/checkrun-shell".to_string(),
                ..quiet_config()
            },
        );
        let result = h.evaluate("broken shell", "true", "").unwrap();
        assert!(!result.passed);
        assert!(result.actual.contains("failed to run"));
        assert_eq!(h.summary(), RunSummary { passed: 0, failed: 1 });
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_exit_is_negative() {
        let output = run_command("kill -9 $$");
        assert_eq!(output.exit_code, -9);
        assert!(!passes("", &output));
    }

    #[test]
    fn test_results_follow_definition_order() {
        let cases: Vec<TestCase> = (0..5)
            .map(|i| TestCase::new(format!("case {i}"), format!("echo {i}"), i.to_string()))
            .collect();
        let battery = Battery::new("Order").section(Section::new("ALL", cases.clone()));

        let mut h = harness();
        assert!(h.run_all(&battery).unwrap());

        let names: Vec<_> = h.results().iter().map(|r| r.name.clone()).collect();
        let expected: Vec<_> = cases.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, expected);
        assert_eq!(h.summary().total(), cases.len());
    }

    #[test]
    fn test_two_failures_out_of_seven() {
        let case = |i: usize, ok: bool| {
            let command = if ok { "echo ok" } else { "echo bad" };
            TestCase::new(format!("Check {i}"), command, "ok")
        };
        let battery = Battery::new("Mixed")
            .section(Section::new(
                "FIRST",
                vec![case(1, false), case(2, true), case(3, true)],
            ))
            .section(Section::new(
                "SECOND",
                vec![case(4, false), case(5, true), case(6, true), case(7, true)],
            ));

        let mut h = harness();
        let all_passed = h.run_all(&battery).unwrap();
        assert!(!all_passed);
        assert_eq!(h.summary(), RunSummary { passed: 5, failed: 2 });

        let text = report(h);
        assert!(text.contains("✅ PASSED: 5/7"));
        assert!(text.contains("❌ FAILED: 2/7"));
        assert!(text.contains("  ❌ Check 1\n     Expected: ok\n     Got: bad\n"));
        assert!(text.contains("  ❌ Check 4\n"));
        assert!(!text.contains("  ❌ Check 2\n"));
        assert!(text.contains("🧪 Check 7... ✅ PASS\n"));
    }

    #[test]
    fn test_print_summary_reflects_failures() {
        let mut h = harness();
        h.evaluate("ok", "true", "").unwrap();
        assert!(h.print_summary().unwrap());

        h.evaluate("bad", "false", "").unwrap();
        assert!(!h.print_summary().unwrap());
    }

    #[test]
    fn test_run_all_report_layout() {
        let battery = Battery::new("Layout Suite")
            .section(Section::new("ONE", vec![TestCase::new("a", "echo ok", "ok")]))
            .section(Section::new("TWO", vec![TestCase::new("b", "true", "")]))
            .success_note("All good.");

        let mut h = harness();
        let timestamp = h.timestamp();
        assert!(h.run_all(&battery).unwrap());

        let text = report(h);
        assert!(text.starts_with(&format!(
            "{rule}\n  Layout Suite\n{rule}\n\n📋 Test Run: {timestamp}\n\nONE\n",
            rule = "=".repeat(output::RULE_WIDTH)
        )));
        assert!(text.contains("🧪 a... ✅ PASS\n\nTWO\n"));
        assert!(text.contains("🎉 ALL TESTS PASSED!\n\nAll good.\n"));
    }
}
