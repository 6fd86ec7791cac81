//! CLI route: run context and the route table. Wires config into the controller and
//! hands results to presentation.

use crate::cli::help::command_name;
use crate::cli::output::CommandOutput;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_check_result_json, format_check_result_text, format_run_report_json,
    format_run_report_text, ConsoleObserver,
};
use crate::config::{ConfigLoader, ParsesmithConfig, StrategyKind};
use crate::controller::{load_reference, RetryController};
use crate::document::{DocumentReader, ExtensionReader};
use crate::error::AgentError;
use crate::progress::{NoopObserver, RunObserver};
use crate::provider::ProviderFactory;
use crate::runner::AttemptRunner;
use crate::slot::{compile_or_unloadable, store, ParserRegistry, RecipeCompiler};
use crate::strategy::{GenerationStrategy, LlmStrategy, TemplateStrategy};
use crate::target::{Target, TargetLayout};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, info_span};

/// Runtime context for CLI execution: workspace root and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: ParsesmithConfig,
    reader: Arc<dyn DocumentReader>,
}

impl RunContext {
    /// Load and validate configuration. An explicit config path replaces the file layers.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, AgentError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(workspace_root, config)
    }

    pub fn with_config(
        workspace_root: PathBuf,
        config: ParsesmithConfig,
    ) -> Result<Self, AgentError> {
        if let Err(errors) = config.validate() {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AgentError::ConfigError(joined));
        }
        Ok(Self {
            workspace_root,
            config,
            reader: Arc::new(ExtensionReader),
        })
    }

    pub fn config(&self) -> &ParsesmithConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn layout(&self, target: &Target) -> TargetLayout {
        TargetLayout::resolve(&self.workspace_root, &self.config.layout, target)
    }

    /// Execute a CLI command via the route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, AgentError> {
        let _span = info_span!(
            "command",
            name = command_name(command),
            target_id = command.target(),
            format = command.format()
        )
        .entered();
        match command {
            Commands::Run {
                target,
                strategy,
                provider,
                max_attempts,
                format,
            } => {
                let target = Target::new(target.as_str())?;
                let strategy = match strategy {
                    Some(name) => parse_strategy(name)?,
                    None => self.config.run.strategy,
                };
                let max_attempts = max_attempts.unwrap_or(self.config.run.max_attempts);
                self.handle_run(&target, strategy, provider.as_deref(), max_attempts, format)
            }
            Commands::Check { target, format } => {
                let target = Target::new(target.as_str())?;
                self.handle_check(&target, format)
            }
        }
    }

    fn handle_run(
        &self,
        target: &Target,
        strategy: StrategyKind,
        provider: Option<&str>,
        max_attempts: u32,
        format: &str,
    ) -> Result<CommandOutput, AgentError> {
        let layout = self.layout(target);
        let generator = self.build_strategy(strategy, provider)?;
        let observer: Arc<dyn RunObserver> = if format == "json" {
            Arc::new(NoopObserver)
        } else {
            Arc::new(ConsoleObserver::new(std::io::stdout().is_terminal()))
        };
        let controller = RetryController::new(
            generator,
            Arc::new(RecipeCompiler::new(Arc::clone(&self.reader))),
            max_attempts,
        )?
        .with_observer(observer);

        info!(target_id = %target, %strategy, max_attempts, "Starting run");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let report = runtime.block_on(controller.run(&layout))?;

        let text = match format {
            "json" => format_run_report_json(&report)?,
            _ => format_run_report_text(&report),
        };
        Ok(CommandOutput::new(text, report.outcome.is_success()))
    }

    fn handle_check(&self, target: &Target, format: &str) -> Result<CommandOutput, AgentError> {
        let layout = self.layout(target);
        let reference = load_reference(&layout)?;
        let content = store::read_slot(&layout.slot)?
            .ok_or_else(|| AgentError::SlotMissing(target.to_string()))?;

        let compiler = RecipeCompiler::new(Arc::clone(&self.reader));
        let mut registry = ParserRegistry::new();
        registry.install(
            target.clone(),
            compile_or_unloadable(&compiler, &content),
            content.digest(),
        );

        let result =
            AttemptRunner::new().run_attempt(&registry, target, &layout.document, &reference)?;
        let digest = content.digest();
        let text = match format {
            "json" => format_check_result_json(target, &digest, &result)?,
            _ => format_check_result_text(target, &digest, &result),
        };
        Ok(CommandOutput::new(text, result.passed()))
    }

    fn build_strategy(
        &self,
        strategy: StrategyKind,
        provider: Option<&str>,
    ) -> Result<Arc<dyn GenerationStrategy>, AgentError> {
        match strategy {
            StrategyKind::Template => Ok(Arc::new(TemplateStrategy::new())),
            StrategyKind::Llm => {
                let (name, profile) = self.config.provider_for_run(provider).ok_or_else(|| {
                    AgentError::ProviderNotConfigured(match provider {
                        Some(name) => format!("Provider not found: {}", name),
                        None => "Select a provider with --provider or [run] provider".to_string(),
                    })
                })?;
                let client = ProviderFactory::create_client(&profile.to_model_provider()?)?;
                info!(provider = name, model = client.model_name(), "Provider selected");
                Ok(Arc::new(LlmStrategy::new(
                    Arc::from(client),
                    Arc::clone(&self.reader),
                    &self.config.prompt,
                    profile.default_options.clone(),
                )))
            }
        }
    }
}

fn parse_strategy(name: &str) -> Result<StrategyKind, AgentError> {
    match name {
        "template" => Ok(StrategyKind::Template),
        "llm" => Ok(StrategyKind::Llm),
        other => Err(AgentError::ConfigError(format!(
            "Unknown strategy '{}' (expected 'template' or 'llm')",
            other
        ))),
    }
}
