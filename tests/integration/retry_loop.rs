//! End-to-end retry loop tests with real recipes, a real compiler and text documents.

use crate::integration::test_utils::{TestWorkspace, GOOD_RECIPE, WRONG_SCHEMA_RECIPE};
use async_trait::async_trait;
use parking_lot::Mutex;
use parsesmith::controller::{AttemptRecord, RetryController, RunOutcome};
use parsesmith::document::PlainTextReader;
use parsesmith::error::{AgentError, ParseFailureKind};
use parsesmith::progress::RunObserver;
use parsesmith::runner::AttemptResult;
use parsesmith::slot::{RecipeCompiler, SlotContent};
use parsesmith::strategy::{GenerationStrategy, ProposalRequest, TemplateStrategy};
use parsesmith::target::Target;
use std::sync::Arc;

fn compiler() -> Arc<RecipeCompiler> {
    Arc::new(RecipeCompiler::new(Arc::new(PlainTextReader)))
}

/// Proposes bodies in order and remembers the feedback it was handed.
struct Sequence {
    bodies: Vec<&'static str>,
    feedback: Mutex<Vec<Option<String>>>,
}

impl Sequence {
    fn new(bodies: Vec<&'static str>) -> Self {
        Self {
            bodies,
            feedback: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerationStrategy for Sequence {
    fn name(&self) -> &str {
        "sequence"
    }

    async fn propose(&self, request: &ProposalRequest<'_>) -> Result<SlotContent, AgentError> {
        self.feedback
            .lock()
            .push(request.previous().and_then(AttemptRecord::feedback));
        let index = (request.attempt as usize - 1).min(self.bodies.len() - 1);
        Ok(SlotContent::new(self.bodies[index], "sequence"))
    }
}

/// Deletes the statement before handing back a valid recipe.
struct DocumentRemover;

#[async_trait]
impl GenerationStrategy for DocumentRemover {
    fn name(&self) -> &str {
        "document-remover"
    }

    async fn propose(&self, request: &ProposalRequest<'_>) -> Result<SlotContent, AgentError> {
        if request.layout.document.exists() {
            std::fs::remove_file(&request.layout.document)?;
        }
        Ok(SlotContent::new(GOOD_RECIPE, "document-remover"))
    }
}

#[derive(Default)]
struct Recording {
    events: Mutex<Vec<String>>,
}

impl RunObserver for Recording {
    fn run_started(&self, target: &Target, max_attempts: u32) {
        self.events
            .lock()
            .push(format!("start {} {}", target, max_attempts));
    }

    fn attempt_started(&self, _target: &Target, attempt: u32, _max_attempts: u32) {
        self.events.lock().push(format!("attempt {}", attempt));
    }

    fn attempt_finished(&self, _target: &Target, record: &AttemptRecord) {
        self.events
            .lock()
            .push(format!("finished {} {}", record.attempt, record.passed()));
    }

    fn run_finished(&self, _target: &Target, outcome: &RunOutcome) {
        self.events.lock().push(format!("end {}", outcome.is_success()));
    }
}

#[tokio::test]
async fn template_recipe_matches_on_first_attempt() {
    let ws = TestWorkspace::new("icici");
    ws.write_template(GOOD_RECIPE);

    let controller = RetryController::new(Arc::new(TemplateStrategy::new()), compiler(), 3).unwrap();
    let report = controller.run(&ws.layout).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Succeeded { attempt: 1 });
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(ws.slot_body(), GOOD_RECIPE);
    let table = report.attempts[0].result.table().unwrap();
    assert_eq!(table.row_count(), 3);
}

#[tokio::test]
async fn feedback_from_each_failure_reaches_the_next_proposal() {
    let ws = TestWorkspace::new("icici");
    let strategy = Arc::new(Sequence::new(vec![
        "columns = [",
        WRONG_SCHEMA_RECIPE,
        GOOD_RECIPE,
    ]));
    let observer = Arc::new(Recording::default());

    let controller = RetryController::new(strategy.clone(), compiler(), 3)
        .unwrap()
        .with_observer(observer.clone());
    let report = controller.run(&ws.layout).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Succeeded { attempt: 3 });
    let feedback = strategy.feedback.lock().clone();
    assert_eq!(feedback.len(), 3);
    assert!(feedback[0].is_none());
    assert!(feedback[1]
        .as_deref()
        .unwrap()
        .contains("Invalid recipe TOML"));
    assert!(feedback[2].as_deref().unwrap().contains("schema mismatch"));

    assert_eq!(
        observer.events.lock().clone(),
        vec![
            "start icici 3",
            "attempt 1",
            "finished 1 false",
            "attempt 2",
            "finished 2 false",
            "attempt 3",
            "finished 3 true",
            "end true",
        ]
    );
}

#[tokio::test]
async fn ceiling_of_one_stops_after_single_failure() {
    let ws = TestWorkspace::new("icici");
    let strategy = Arc::new(Sequence::new(vec![WRONG_SCHEMA_RECIPE]));

    let report = RetryController::new(strategy.clone(), compiler(), 1)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::ExhaustedRetries { attempts: 1 });
    assert_eq!(strategy.feedback.lock().len(), 1);
    assert_eq!(ws.slot_body(), WRONG_SCHEMA_RECIPE);
}

#[tokio::test]
async fn unparseable_slot_content_counts_as_a_failed_attempt() {
    let ws = TestWorkspace::new("icici");
    let strategy = Arc::new(Sequence::new(vec!["this is not a recipe"]));

    let report = RetryController::new(strategy, compiler(), 2)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::ExhaustedRetries { attempts: 2 });
    for record in &report.attempts {
        assert!(record.result.table().is_none());
        assert!(record.feedback().unwrap().starts_with("Parser failed"));
    }
}

#[tokio::test]
async fn missing_document_aborts_before_any_attempt() {
    let ws = TestWorkspace::new("icici");
    ws.write_template(GOOD_RECIPE);
    std::fs::remove_file(&ws.layout.document).unwrap();

    let err = RetryController::new(Arc::new(TemplateStrategy::new()), compiler(), 3)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::DocumentNotFound(_)));
    assert!(!ws.layout.slot.exists());
}

#[tokio::test]
async fn document_removed_mid_run_fails_attempts_instead_of_aborting() {
    let ws = TestWorkspace::new("icici");

    let report = RetryController::new(Arc::new(DocumentRemover), compiler(), 2)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::ExhaustedRetries { attempts: 2 });
    assert_eq!(report.attempts.len(), 2);
    for record in &report.attempts {
        match &record.result {
            AttemptResult::ParseFailed { failure } => {
                assert_eq!(failure.kind, ParseFailureKind::Document)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
    assert_eq!(ws.slot_body(), GOOD_RECIPE);
}

#[tokio::test]
async fn malformed_reference_is_fatal() {
    let ws = TestWorkspace::with_inputs("icici", "text", "Date,Amount\n01-01-2024\n");
    ws.write_template(GOOD_RECIPE);

    let err = RetryController::new(Arc::new(TemplateStrategy::new()), compiler(), 3)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::ReferenceMalformed { .. }));
}

#[tokio::test]
async fn missing_template_is_a_fault_not_an_attempt() {
    let ws = TestWorkspace::new("icici");

    let err = RetryController::new(Arc::new(TemplateStrategy::new()), compiler(), 3)
        .unwrap()
        .run(&ws.layout)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::NoGenerator { .. }));
    assert!(!ws.layout.slot.exists());
}
