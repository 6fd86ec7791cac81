//! Retry controller: drives generate → test → decide until the slot output matches the
//! reference table or the failure ceiling is reached.
//!
//! States: `Planning → Generating → Testing → Deciding → {Planning | Succeeded | Failed}`.
//! The counter tracks failed attempts only, so a success never counts against the ceiling.
//! Faults outside the slot/oracle boundary return `Err` immediately and consume no budget.

use crate::error::AgentError;
use crate::progress::{NoopObserver, RunObserver};
use crate::runner::{AttemptResult, AttemptRunner};
use crate::slot::{compile_or_unloadable, store, ParserRegistry, SlotCompiler, SlotContent};
use crate::strategy::{GenerationStrategy, ProposalRequest};
use crate::table::Table;
use crate::target::{Target, TargetLayout};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Attempt ceiling used when none is configured
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// One loop iteration, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub content: SlotContent,
    pub digest: String,
    pub result: AttemptResult,
}

impl AttemptRecord {
    pub fn new(attempt: u32, content: SlotContent, result: AttemptResult) -> Self {
        let digest = content.digest();
        Self {
            attempt,
            content,
            digest,
            result,
        }
    }

    pub fn passed(&self) -> bool {
        self.result.passed()
    }

    /// Failure detail for the next strategy call
    pub fn feedback(&self) -> Option<String> {
        self.result.failure_detail()
    }
}

/// Terminal result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Output matched on this (1-based) attempt
    Succeeded { attempt: u32 },
    /// The failure ceiling was reached
    ExhaustedRetries { attempts: u32 },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded { .. })
    }
}

/// Outcome plus every attempt made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub target: Target,
    pub max_attempts: u32,
    pub outcome: RunOutcome,
    pub attempts: Vec<AttemptRecord>,
}

enum State {
    Planning,
    Generating(SlotContent),
    Testing(SlotContent),
    Deciding(AttemptRecord),
    Succeeded { attempt: u32 },
    Failed { attempts: u32 },
}

/// Single-use controller; [`RetryController::run`] consumes it.
pub struct RetryController {
    strategy: Arc<dyn GenerationStrategy>,
    compiler: Arc<dyn SlotCompiler>,
    registry: Arc<RwLock<ParserRegistry>>,
    runner: AttemptRunner,
    observer: Arc<dyn RunObserver>,
    max_attempts: u32,
}

impl RetryController {
    pub fn new(
        strategy: Arc<dyn GenerationStrategy>,
        compiler: Arc<dyn SlotCompiler>,
        max_attempts: u32,
    ) -> Result<Self, AgentError> {
        if max_attempts == 0 {
            return Err(AgentError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            strategy,
            compiler,
            registry: Arc::new(RwLock::new(ParserRegistry::new())),
            runner: AttemptRunner::new(),
            observer: Arc::new(NoopObserver),
            max_attempts,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn registry(&self) -> Arc<RwLock<ParserRegistry>> {
        Arc::clone(&self.registry)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn run(self, layout: &TargetLayout) -> Result<RunReport, AgentError> {
        let target = &layout.target;
        let reference = load_reference(layout)?;

        info!(
            target_id = %target,
            strategy = self.strategy.name(),
            max_attempts = self.max_attempts,
            reference_rows = reference.row_count(),
            "run_started"
        );
        self.observer.run_started(target, self.max_attempts);

        let mut failures = 0u32;
        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut state = State::Planning;

        let outcome = loop {
            state = match state {
                State::Planning => {
                    let attempt = failures + 1;
                    info!(target_id = %target, attempt, "attempt_started");
                    self.observer
                        .attempt_started(target, attempt, self.max_attempts);
                    let request = ProposalRequest {
                        layout,
                        attempt,
                        max_attempts: self.max_attempts,
                        reference: &reference,
                        history: &history,
                    };
                    let content = self.strategy.propose(&request).await?;
                    State::Generating(content)
                }
                State::Generating(content) => {
                    store::write_slot(&layout.slot, &content)?;
                    let parser = compile_or_unloadable(self.compiler.as_ref(), &content);
                    self.registry
                        .write()
                        .install(target.clone(), parser, content.digest());
                    debug!(
                        target_id = %target,
                        slot = %layout.slot.display(),
                        digest = %content.short_digest(),
                        origin = %content.origin,
                        "slot_written"
                    );
                    State::Testing(content)
                }
                State::Testing(content) => {
                    let result = self.runner.run_attempt(
                        &self.registry.read(),
                        target,
                        &layout.document,
                        &reference,
                    )?;
                    let record = AttemptRecord::new(failures + 1, content, result);
                    info!(
                        target_id = %target,
                        attempt = record.attempt,
                        passed = record.passed(),
                        digest = %record.content.short_digest(),
                        feedback = record.feedback().as_deref().unwrap_or(""),
                        "attempt_finished"
                    );
                    self.observer.attempt_finished(target, &record);
                    State::Deciding(record)
                }
                State::Deciding(record) => {
                    let passed = record.passed();
                    let attempt = record.attempt;
                    history.push(record);
                    if passed {
                        State::Succeeded { attempt }
                    } else {
                        failures += 1;
                        if failures >= self.max_attempts {
                            State::Failed { attempts: failures }
                        } else {
                            State::Planning
                        }
                    }
                }
                State::Succeeded { attempt } => break RunOutcome::Succeeded { attempt },
                State::Failed { attempts } => break RunOutcome::ExhaustedRetries { attempts },
            };
        };

        match outcome {
            RunOutcome::Succeeded { attempt } => {
                info!(target_id = %target, attempt, "run_finished: succeeded")
            }
            RunOutcome::ExhaustedRetries { attempts } => {
                warn!(target_id = %target, attempts, "run_finished: retries exhausted")
            }
        }
        self.observer.run_finished(target, &outcome);

        Ok(RunReport {
            target: target.clone(),
            max_attempts: self.max_attempts,
            outcome,
            attempts: history,
        })
    }
}

/// Preflight: inputs must exist and the reference must be a well-formed table.
pub fn load_reference(layout: &TargetLayout) -> Result<Table, AgentError> {
    layout.ensure_inputs()?;
    Table::read_csv(&layout.reference).map_err(|source| AgentError::ReferenceMalformed {
        path: layout.reference.clone(),
        source,
    })
}
