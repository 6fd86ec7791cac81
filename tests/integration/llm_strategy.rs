//! LLM strategy driven by a mock provider through the full retry loop.

use crate::integration::test_utils::{TestWorkspace, GOOD_RECIPE, WRONG_SCHEMA_RECIPE};
use parsesmith::config::PromptConfig;
use parsesmith::controller::{RetryController, RunOutcome};
use parsesmith::document::PlainTextReader;
use parsesmith::provider::{CompletionOptions, MessageRole, MockProvider};
use parsesmith::slot::RecipeCompiler;
use parsesmith::strategy::LlmStrategy;
use std::sync::Arc;

fn fenced(recipe: &str) -> String {
    format!("Here is the recipe:\n```toml\n{}\n```\n", recipe.trim())
}

fn strategy(mock: Arc<MockProvider>) -> Arc<LlmStrategy> {
    Arc::new(LlmStrategy::new(
        mock,
        Arc::new(PlainTextReader),
        &PromptConfig::default(),
        CompletionOptions::default(),
    ))
}

#[tokio::test]
async fn second_prompt_carries_the_first_failure() {
    let ws = TestWorkspace::new("icici");
    let mock = Arc::new(MockProvider::new(
        "mock".to_string(),
        "mock-model".to_string(),
        vec![fenced(WRONG_SCHEMA_RECIPE), fenced(GOOD_RECIPE)],
    ));
    let compiler = Arc::new(RecipeCompiler::new(Arc::new(PlainTextReader)));

    let report = RetryController::new(strategy(mock.clone()), compiler, 3)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Succeeded { attempt: 2 });
    assert_eq!(report.attempts[0].content.origin, "llm:mock/mock-model");

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0][1];
    assert_eq!(first.role, MessageRole::User);
    assert!(first.content.contains("UPI Payment Grocery"));
    assert!(first.content.contains("Expected row count: 3"));
    assert!(!first.content.contains("It failed"));

    let second = &requests[1][1].content;
    assert!(second.contains("attempt 2 of 3"));
    assert!(second.contains("schema mismatch"));
    assert!(second.contains("\"Debit\""));
}

#[tokio::test]
async fn persistent_bad_replies_exhaust_the_ceiling() {
    let ws = TestWorkspace::new("hdfc");
    let mock = Arc::new(MockProvider::new(
        "mock".to_string(),
        "mock-model".to_string(),
        vec![fenced(WRONG_SCHEMA_RECIPE)],
    ));
    let compiler = Arc::new(RecipeCompiler::new(Arc::new(PlainTextReader)));

    let report = RetryController::new(strategy(mock.clone()), compiler, 2)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::ExhaustedRetries { attempts: 2 });
    assert_eq!(mock.requests().len(), 2);
    assert_eq!(ws.slot_body(), WRONG_SCHEMA_RECIPE.trim());
}
