//! Template strategy: replays a hand-written recipe from `templates/<target>.toml`.

use crate::error::AgentError;
use crate::slot::SlotContent;
use crate::strategy::{GenerationStrategy, ProposalRequest};
use async_trait::async_trait;
use std::io::ErrorKind;
use tracing::debug;

pub const TEMPLATE_ORIGIN: &str = "template";

/// Proposes the same content on every attempt; feedback is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateStrategy;

impl TemplateStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationStrategy for TemplateStrategy {
    fn name(&self) -> &str {
        TEMPLATE_ORIGIN
    }

    async fn propose(&self, request: &ProposalRequest<'_>) -> Result<SlotContent, AgentError> {
        let path = &request.layout.template;
        let body = match std::fs::read_to_string(path) {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AgentError::NoGenerator {
                    target: request.target().to_string(),
                    path: path.clone(),
                })
            }
            Err(e) => return Err(AgentError::IoError(e)),
        };
        debug!(
            target_id = %request.target(),
            template = %path.display(),
            attempt = request.attempt,
            "Template loaded"
        );
        Ok(SlotContent::new(body, TEMPLATE_ORIGIN))
    }
}
