//! Check presentation: one attempt against the parser on disk.

use crate::cli::presentation::shared::format_diff_table;
use crate::error::AgentError;
use crate::runner::AttemptResult;
use crate::target::Target;
use serde_json::json;

pub fn format_check_result_text(target: &Target, digest: &str, result: &AttemptResult) -> String {
    let mut out = format!("Checked parser for {} ({})\n", target, &digest[..digest.len().min(12)]);
    match result {
        AttemptResult::Parsed { table, verdict } => {
            out.push_str(&format!(
                "Parsed {} row(s) x {} column(s)\n",
                table.row_count(),
                table.columns().len()
            ));
            match verdict.diff() {
                None => out.push_str("Test passed! Parser matches CSV."),
                Some(diff) => {
                    out.push_str("Test failed! Parser output != CSV.\n");
                    out.push_str(&format_diff_table(diff));
                }
            }
        }
        AttemptResult::ParseFailed { failure } => {
            out.push_str(&format!("Test failed! {}", failure));
        }
    }
    out
}

pub fn format_check_result_json(
    target: &Target,
    digest: &str,
    result: &AttemptResult,
) -> Result<String, AgentError> {
    let (rows, verdict, failure) = match result {
        AttemptResult::Parsed { table, verdict } => {
            (Some(table.row_count()), Some(verdict), None)
        }
        AttemptResult::ParseFailed { failure } => (None, None, Some(failure)),
    };
    let out = json!({
        "target": target,
        "digest": digest,
        "passed": result.passed(),
        "rows": rows,
        "verdict": verdict,
        "failure": failure,
    });
    serde_json::to_string_pretty(&out)
        .map_err(|e| AgentError::ConfigError(format!("Failed to serialize result: {}", e)))
}
