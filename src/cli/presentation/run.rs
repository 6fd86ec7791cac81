//! Run presentation: live progress lines and the final report.

use crate::cli::presentation::shared::format_diff_table;
use crate::controller::{AttemptRecord, RunOutcome, RunReport};
use crate::error::AgentError;
use crate::progress::RunObserver;
use crate::runner::AttemptResult;
use crate::target::Target;
use owo_colors::OwoColorize;
use std::io::Write;

/// Prints progress to stdout as the run advances
#[derive(Debug, Clone, Copy)]
pub struct ConsoleObserver {
    color: bool,
}

impl ConsoleObserver {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn emit(&self, text: String) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        // Progress is best-effort; a closed stdout must not abort the run
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

impl RunObserver for ConsoleObserver {
    fn attempt_started(&self, target: &Target, attempt: u32, max_attempts: u32) {
        self.emit(attempt_started_line(target, attempt, max_attempts));
    }

    fn attempt_finished(&self, _target: &Target, record: &AttemptRecord) {
        self.emit(attempt_finished_lines(record, self.color));
    }

    fn run_finished(&self, _target: &Target, outcome: &RunOutcome) {
        self.emit(outcome_line(outcome, self.color));
    }
}

pub fn attempt_started_line(target: &Target, attempt: u32, max_attempts: u32) -> String {
    format!("\nAttempt {}/{} for {}", attempt, max_attempts, target)
}

pub fn attempt_finished_lines(record: &AttemptRecord, color: bool) -> String {
    if record.passed() {
        let line = "Test passed! Parser output matches the reference CSV.";
        return if color { line.green().to_string() } else { line.to_string() };
    }

    let headline = "Test failed! Parser output does not match the reference CSV.";
    let mut out = if color {
        headline.red().to_string()
    } else {
        headline.to_string()
    };
    match &record.result {
        AttemptResult::ParseFailed { failure } => {
            out.push_str(&format!("\n  {}", failure));
        }
        AttemptResult::Parsed { verdict, .. } => {
            if let Some(diff) = verdict.diff() {
                out.push('\n');
                out.push_str(&format_diff_table(diff));
            }
        }
    }
    out
}

fn outcome_line(outcome: &RunOutcome, color: bool) -> String {
    match outcome {
        RunOutcome::Succeeded { attempt } => {
            let line = format!("Success on attempt {}!", attempt);
            if color { line.green().bold().to_string() } else { line }
        }
        RunOutcome::ExhaustedRetries { attempts } => {
            let line = format!("Failed after {} attempt(s).", attempts);
            if color { line.yellow().bold().to_string() } else { line }
        }
    }
}

/// Summary printed after the live progress
pub fn format_run_report_text(report: &RunReport) -> String {
    let mut out = format!(
        "Target: {}\nAttempts: {} (ceiling {})",
        report.target,
        report.attempts.len(),
        report.max_attempts
    );
    if let Some(last) = report.attempts.last() {
        out.push_str(&format!(
            "\nLast slot content: {} ({})",
            last.content.short_digest(),
            last.content.origin
        ));
    }
    out
}

pub fn format_run_report_json(report: &RunReport) -> Result<String, AgentError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AgentError::ConfigError(format!("Failed to serialize report: {}", e)))
}
