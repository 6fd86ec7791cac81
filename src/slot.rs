//! Parser slots: the replaceable parser implementation held for each target.
//!
//! A slot's content is produced by a generation strategy, persisted to disk, and compiled into
//! a [`Parser`]. Content that cannot be compiled still occupies the slot as an
//! [`UnloadableSlot`], which reports the compile failure every time it is invoked.

use crate::error::ParseFailure;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub mod recipe;
pub mod registry;
pub mod store;

pub use recipe::{ColumnType, ParserRecipe, RecipeCompiler, RecipeParser};
pub use registry::{InstalledSlot, ParserRegistry};

/// A parser: pure function of the document path
pub trait Parser: Send + Sync {
    fn parse(&self, document: &Path) -> Result<Table, ParseFailure>;
}

/// Turns slot content into a runnable parser
pub trait SlotCompiler: Send + Sync {
    fn compile(&self, content: &SlotContent) -> Result<Arc<dyn Parser>, ParseFailure>;
}

/// Generated slot content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotContent {
    /// Text written to the slot file
    pub body: String,
    /// Name of the strategy (or source) that produced it
    pub origin: String,
}

impl SlotContent {
    pub fn new(body: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            origin: origin.into(),
        }
    }

    /// blake3 digest of the body, hex encoded
    pub fn digest(&self) -> String {
        hex::encode(blake3::hash(self.body.as_bytes()).as_bytes())
    }

    /// First 12 hex characters of [`SlotContent::digest`], for log lines
    pub fn short_digest(&self) -> String {
        let mut digest = self.digest();
        digest.truncate(12);
        digest
    }
}

/// Slot whose content failed to compile
#[derive(Debug, Clone)]
pub struct UnloadableSlot {
    failure: ParseFailure,
}

impl UnloadableSlot {
    pub fn new(failure: ParseFailure) -> Self {
        Self { failure }
    }
}

impl Parser for UnloadableSlot {
    fn parse(&self, _document: &Path) -> Result<Table, ParseFailure> {
        Err(self.failure.clone())
    }
}

/// Compile content, falling back to an [`UnloadableSlot`] carrying the compile error.
pub fn compile_or_unloadable(
    compiler: &dyn SlotCompiler,
    content: &SlotContent,
) -> Arc<dyn Parser> {
    match compiler.compile(content) {
        Ok(parser) => parser,
        Err(failure) => {
            tracing::debug!(detail = %failure.detail, "Slot content did not compile");
            Arc::new(UnloadableSlot::new(failure))
        }
    }
}
