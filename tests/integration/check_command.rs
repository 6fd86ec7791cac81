//! CLI route tests: `run` and `check` through a run context.

use crate::integration::test_utils::{TestWorkspace, GOOD_RECIPE, WRONG_SCHEMA_RECIPE};
use parsesmith::cli::{Commands, RunContext, EXIT_FAILURE, EXIT_SUCCESS};
use parsesmith::error::AgentError;

fn run(target: &str, max_attempts: Option<u32>, format: &str) -> Commands {
    Commands::Run {
        target: target.to_string(),
        strategy: Some("template".to_string()),
        provider: None,
        max_attempts,
        format: format.to_string(),
    }
}

fn check(target: &str, format: &str) -> Commands {
    Commands::Check {
        target: target.to_string(),
        format: format.to_string(),
    }
}

#[test]
fn run_then_check_both_pass() {
    let ws = TestWorkspace::new("icici");
    ws.write_template(GOOD_RECIPE);
    let ctx = RunContext::with_config(ws.root().to_path_buf(), ws.config()).unwrap();

    let output = ctx.execute(&run("icici", None, "text")).unwrap();
    assert_eq!(output.exit_code, EXIT_SUCCESS);
    assert!(output.text.contains("icici"));

    let output = ctx.execute(&check("icici", "json")).unwrap();
    assert_eq!(output.exit_code, EXIT_SUCCESS);
    let json: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(json["passed"], true);
}

#[test]
fn exhausted_run_exits_with_failure_and_reports_attempts() {
    let ws = TestWorkspace::new("icici");
    ws.write_template(WRONG_SCHEMA_RECIPE);
    let ctx = RunContext::with_config(ws.root().to_path_buf(), ws.config()).unwrap();

    let output = ctx.execute(&run("icici", Some(2), "json")).unwrap();
    assert_eq!(output.exit_code, EXIT_FAILURE);
    let json: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(json["outcome"]["outcome"], "exhausted_retries");
    assert_eq!(json["outcome"]["attempts"], 2);
    assert_eq!(json["attempts"].as_array().unwrap().len(), 2);

    // The failed recipe stays in the slot and check reports it the same way
    let output = ctx.execute(&check("icici", "text")).unwrap();
    assert_eq!(output.exit_code, EXIT_FAILURE);
}

#[test]
fn run_for_unknown_target_is_a_fault() {
    let ws = TestWorkspace::new("icici");
    let ctx = RunContext::with_config(ws.root().to_path_buf(), ws.config()).unwrap();

    let err = ctx.execute(&run("sbi", None, "text")).unwrap_err();
    assert!(matches!(err, AgentError::ReferenceNotFound(_)));
}

#[test]
fn zero_attempt_ceiling_is_rejected() {
    let ws = TestWorkspace::new("icici");
    ws.write_template(GOOD_RECIPE);
    let ctx = RunContext::with_config(ws.root().to_path_buf(), ws.config()).unwrap();

    let err = ctx.execute(&run("icici", Some(0), "text")).unwrap_err();
    assert!(matches!(err, AgentError::ConfigError(_)));
    assert!(!ws.layout.slot.exists());
}
