//! Error types for parser generation runs.
//!
//! `AgentError` covers environment and configuration faults; every variant aborts a run.
//! `ParseFailure` is the expected, non-fatal failure of a parser slot and is folded into the
//! retry loop instead of propagating.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Malformed table construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Row {row} has {actual} cells, schema has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to read delimited table: {0}")]
    Csv(String),
}

/// Fatal faults: anything outside the parser slot / oracle boundary
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid target identifier: {0:?}")]
    InvalidTarget(String),

    #[error("Reference table not found: {0}")]
    ReferenceNotFound(PathBuf),

    #[error("Reference table {path} is malformed: {source}")]
    ReferenceMalformed {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Failed to write parser slot {path}: {source}")]
    SlotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read parser slot {path}: {source}")]
    SlotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No parser slot for target '{0}'. Run `parsesmith run --target {0}` first.")]
    SlotMissing(String),

    #[error("No generator for target '{target}': template {path} does not exist")]
    NoGenerator { target: String, path: PathBuf },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for AgentError {
    fn from(err: config::ConfigError) -> Self {
        AgentError::ConfigError(err.to_string())
    }
}

/// Where a parser slot gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailureKind {
    /// The document could not be opened or its text extracted
    Document,
    /// The slot content is not a usable parser
    Recipe,
    /// The parser ran but could not build a table
    Extraction,
}

/// A parser slot could not produce a table at all
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?} failure: {detail}")]
pub struct ParseFailure {
    pub kind: ParseFailureKind,
    pub detail: String,
}

impl ParseFailure {
    pub fn document(detail: impl Into<String>) -> Self {
        Self {
            kind: ParseFailureKind::Document,
            detail: detail.into(),
        }
    }

    pub fn recipe(detail: impl Into<String>) -> Self {
        Self {
            kind: ParseFailureKind::Recipe,
            detail: detail.into(),
        }
    }

    pub fn extraction(detail: impl Into<String>) -> Self {
        Self {
            kind: ParseFailureKind::Extraction,
            detail: detail.into(),
        }
    }
}

impl From<TableError> for ParseFailure {
    fn from(err: TableError) -> Self {
        ParseFailure::extraction(err.to_string())
    }
}
