//! Parsesmith: self-correcting bank statement parser generation
//!
//! A retry controller asks a generation strategy for parser content, installs it into a
//! per-target slot, runs it on a sample document and compares the output with a reference
//! table. Feedback from each failed attempt flows into the next proposal until the output
//! matches or the attempt ceiling is reached.

pub mod cli;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod progress;
pub mod provider;
pub mod runner;
pub mod slot;
pub mod strategy;
pub mod table;
pub mod target;

pub use controller::{AttemptRecord, RetryController, RunOutcome, RunReport};
pub use error::{AgentError, ParseFailure, ParseFailureKind, TableError};
pub use oracle::{compare, equivalent, TableDiff, Verdict};
pub use runner::{AttemptResult, AttemptRunner};
pub use slot::{Parser, ParserRegistry, SlotCompiler, SlotContent};
pub use strategy::{GenerationStrategy, ProposalRequest};
pub use table::{Cell, Table};
pub use target::{Target, TargetLayout};
