//! Layered configuration through the public loader and run context.

use crate::integration::test_utils::{with_isolated_env, write_file};
use parsesmith::cli::RunContext;
use parsesmith::config::{ConfigLoader, StrategyKind};
use parsesmith::error::AgentError;
use parsesmith::provider::ProviderType;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn environment_file_overrides_base_workspace_file() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("config/config.toml"),
        "[run]\nmax_attempts = 4\n\n[layout]\ndocument_extension = \"pdf\"\n",
    );
    write_file(
        &temp.path().join("config/ci.toml"),
        "[layout]\ndocument_extension = \"txt\"\n",
    );

    let config = with_isolated_env(
        &temp.path().join("home"),
        &[("PARSESMITH_ENV", "ci")],
        || ConfigLoader::load(temp.path()).unwrap(),
    );
    assert_eq!(config.run.max_attempts, 4);
    assert_eq!(config.layout.document_extension, "txt");
}

#[test]
fn user_file_defines_providers_and_env_selects_one() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    write_file(
        &home.join(".config/parsesmith/config.toml"),
        r#"
[providers.local]
provider_type = "ollama"
model = "llama3"

[providers.cloud]
provider_type = "anthropic"
model = "claude-3-5-sonnet"
"#,
    );

    let config = with_isolated_env(
        &home,
        &[
            ("PARSESMITH__RUN__PROVIDER", "local"),
            ("PARSESMITH__RUN__STRATEGY", "llm"),
        ],
        || ConfigLoader::load(temp.path()).unwrap(),
    );
    assert_eq!(config.run.strategy, StrategyKind::Llm);
    let (name, profile) = config.provider_for_run(None).unwrap();
    assert_eq!(name, "local");
    assert_eq!(profile.provider_type, ProviderType::Ollama);
    assert_eq!(profile.provider_name.as_deref(), Some("local"));
    assert!(config.validate().is_ok());
}

#[test]
fn run_context_rejects_invalid_configuration() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("config/config.toml"),
        "[run]\nmax_attempts = 0\nprovider = \"ghost\"\n",
    );

    let result = with_isolated_env(&temp.path().join("home"), &[], || {
        RunContext::new(temp.path().to_path_buf(), None)
    });
    match result {
        Err(AgentError::ConfigError(message)) => {
            assert!(message.contains("max_attempts"));
            assert!(message.contains("ghost"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid configuration was accepted"),
    }
}

#[test]
fn explicit_config_file_is_used_as_is() {
    let temp = TempDir::new().unwrap();
    let explicit = temp.path().join("elsewhere/parsesmith.toml");
    write_file(&explicit, "[layout]\ndata_dir = \"fixtures\"\n");

    let ctx = with_isolated_env(&temp.path().join("home"), &[], || {
        RunContext::new(temp.path().to_path_buf(), Some(explicit.clone())).unwrap()
    });
    assert_eq!(ctx.config().layout.data_dir, PathBuf::from("fixtures"));
    assert_eq!(ctx.workspace_root(), temp.path());
}
