//! Generation strategies: produce the next content for a target's parser slot.
//!
//! The retry controller only sees [`GenerationStrategy`]. A template strategy replays a fixed
//! recipe; the LLM strategy asks a model provider and feeds it the previous attempt's failure.
//! Errors returned from `propose` are environment faults and end the run.

use crate::controller::AttemptRecord;
use crate::error::AgentError;
use crate::slot::SlotContent;
use crate::table::Table;
use crate::target::{Target, TargetLayout};
use async_trait::async_trait;

pub mod llm;
pub mod prompt;
pub mod template;

pub use llm::LlmStrategy;
pub use template::TemplateStrategy;

/// Everything a strategy may consult when proposing slot content
#[derive(Debug, Clone, Copy)]
pub struct ProposalRequest<'a> {
    pub layout: &'a TargetLayout,
    /// 1-based number of the attempt this proposal is for
    pub attempt: u32,
    pub max_attempts: u32,
    pub reference: &'a Table,
    /// Records of earlier attempts in this run, oldest first
    pub history: &'a [AttemptRecord],
}

impl<'a> ProposalRequest<'a> {
    pub fn target(&self) -> &'a Target {
        &self.layout.target
    }

    /// The most recent attempt, if any
    pub fn previous(&self) -> Option<&'a AttemptRecord> {
        self.history.last()
    }
}

#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    /// Short name recorded as the origin of generated content
    fn name(&self) -> &str;

    async fn propose(&self, request: &ProposalRequest<'_>) -> Result<SlotContent, AgentError>;
}
