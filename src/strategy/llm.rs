//! LLM strategy: asks a model provider for a recipe, feeding back the last failure.

use crate::config::PromptConfig;
use crate::document::DocumentReader;
use crate::error::AgentError;
use crate::provider::{CompletionOptions, ModelProviderClient};
use crate::slot::SlotContent;
use crate::strategy::prompt::{extract_recipe, PromptBuilder};
use crate::strategy::{GenerationStrategy, ProposalRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct LlmStrategy {
    client: Arc<dyn ModelProviderClient>,
    reader: Arc<dyn DocumentReader>,
    prompts: PromptBuilder,
    options: CompletionOptions,
    origin: String,
}

impl LlmStrategy {
    pub fn new(
        client: Arc<dyn ModelProviderClient>,
        reader: Arc<dyn DocumentReader>,
        prompt: &PromptConfig,
        mut options: CompletionOptions,
    ) -> Self {
        options.temperature = Some(prompt.temperature);
        let origin = format!("llm:{}/{}", client.provider_name(), client.model_name());
        Self {
            client,
            reader,
            prompts: PromptBuilder::new(prompt),
            options,
            origin,
        }
    }
}

#[async_trait]
impl GenerationStrategy for LlmStrategy {
    fn name(&self) -> &str {
        &self.origin
    }

    async fn propose(&self, request: &ProposalRequest<'_>) -> Result<SlotContent, AgentError> {
        // An unreadable document still gets a prompt; the slot will report the failure
        let document_text = match self.reader.read_text(&request.layout.document) {
            Ok(text) => text,
            Err(failure) => {
                warn!(target_id = %request.target(), %failure, "Document text unavailable for prompt");
                String::new()
            }
        };

        let messages = self.prompts.messages(request, &document_text);
        let response = self.client.complete(messages, self.options.clone()).await?;
        debug!(
            target_id = %request.target(),
            attempt = request.attempt,
            model = %response.model,
            completion_tokens = response.usage.completion_tokens,
            "Provider replied"
        );

        let recipe = extract_recipe(&response.content);
        if recipe.is_empty() {
            return Err(AgentError::ProviderError(
                "Provider returned an empty reply".to_string(),
            ));
        }
        Ok(SlotContent::new(recipe, self.origin.clone()))
    }
}
