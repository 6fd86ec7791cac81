//! Attempt runner: invoke the current slot for a target and validate its output.

use crate::error::{AgentError, ParseFailure};
use crate::oracle::{self, Verdict};
use crate::slot::ParserRegistry;
use crate::table::Table;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Result of one slot invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptResult {
    /// The slot produced a table; `verdict` is the oracle's ruling on it
    Parsed { table: Table, verdict: Verdict },
    /// The slot could not produce a table
    ParseFailed { failure: ParseFailure },
}

impl AttemptResult {
    pub fn passed(&self) -> bool {
        matches!(
            self,
            AttemptResult::Parsed {
                verdict: Verdict::Equivalent,
                ..
            }
        )
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            AttemptResult::Parsed { table, .. } => Some(table),
            AttemptResult::ParseFailed { .. } => None,
        }
    }

    /// What went wrong, verbatim, for the next generation step. `None` when passed.
    pub fn failure_detail(&self) -> Option<String> {
        match self {
            AttemptResult::Parsed {
                verdict: Verdict::Equivalent,
                ..
            } => None,
            AttemptResult::Parsed {
                verdict: Verdict::Mismatch(diff),
                ..
            } => Some(format!("Output did not match the reference: {}", diff)),
            AttemptResult::ParseFailed { failure } => {
                Some(format!("Parser failed: {}", failure))
            }
        }
    }
}

/// Runs the installed slot for a target against a fixed document
#[derive(Debug, Default, Clone, Copy)]
pub struct AttemptRunner;

impl AttemptRunner {
    pub fn new() -> Self {
        Self
    }

    /// Parse failures and mismatches become a non-passing result; only a
    /// missing slot is raised.
    pub fn run_attempt(
        &self,
        registry: &ParserRegistry,
        target: &Target,
        document: &Path,
        reference: &Table,
    ) -> Result<AttemptResult, AgentError> {
        let parser = registry.parser_or_error(target)?;

        let result = match parser.parse(document) {
            Ok(table) => {
                let verdict = oracle::compare(&table, reference);
                debug!(
                    target_id = %target,
                    rows = table.row_count(),
                    equivalent = verdict.is_equivalent(),
                    "Candidate table validated"
                );
                AttemptResult::Parsed { table, verdict }
            }
            Err(failure) => {
                info!(
                    target_id = %target,
                    kind = ?failure.kind,
                    detail = %failure.detail,
                    "Parser failed"
                );
                AttemptResult::ParseFailed { failure }
            }
        };
        Ok(result)
    }
}
