//! Parser registry: the current parser for each target.

use crate::error::AgentError;
use crate::slot::Parser;
use crate::target::Target;
use std::collections::HashMap;
use std::sync::Arc;

/// A parser installed into a target's slot
#[derive(Clone)]
pub struct InstalledSlot {
    pub parser: Arc<dyn Parser>,
    /// Digest of the content the parser was built from
    pub digest: String,
}

/// In-memory map of target to installed parser. Installing replaces; there is
/// never more than one parser per target.
#[derive(Default)]
pub struct ParserRegistry {
    slots: HashMap<Target, InstalledSlot>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a parser for `target`, returning whatever it replaced
    pub fn install(
        &mut self,
        target: Target,
        parser: Arc<dyn Parser>,
        digest: impl Into<String>,
    ) -> Option<InstalledSlot> {
        self.slots.insert(
            target,
            InstalledSlot {
                parser,
                digest: digest.into(),
            },
        )
    }

    pub fn get(&self, target: &Target) -> Option<&InstalledSlot> {
        self.slots.get(target)
    }

    /// Current parser for `target` or a missing-slot fault
    pub fn parser_or_error(&self, target: &Target) -> Result<Arc<dyn Parser>, AgentError> {
        self.get(target)
            .map(|slot| Arc::clone(&slot.parser))
            .ok_or_else(|| AgentError::SlotMissing(target.to_string()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
