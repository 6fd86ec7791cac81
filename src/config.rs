//! Configuration System
//!
//! Layered configuration: built-in defaults, the user file, workspace files, then
//! `PARSESMITH__SECTION__KEY` environment variables. CLI flags are applied on top by the
//! caller. Validation collects every problem instead of stopping at the first.

use crate::controller::DEFAULT_MAX_ATTEMPTS;
use crate::logging::LoggingConfig;
use crate::provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsesmithConfig {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub prompt: PromptConfig,

    /// Model provider profiles keyed by name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which generation strategy a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Template,
    Llm,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Template => f.write_str("template"),
            StrategyKind::Llm => f.write_str("llm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Failed attempts allowed before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub strategy: StrategyKind,

    /// Provider profile used by the llm strategy
    #[serde(default)]
    pub provider: Option<String>,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: StrategyKind::default(),
            provider: None,
        }
    }
}

/// Directory conventions, relative to the workspace root unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_parsers_dir")]
    pub parsers_dir: PathBuf,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_parsers_dir() -> PathBuf {
    PathBuf::from("custom_parsers")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_document_extension() -> String {
    "pdf".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            parsers_dir: default_parsers_dir(),
            templates_dir: default_templates_dir(),
            document_extension: default_document_extension(),
        }
    }
}

/// How much context the llm strategy puts in its prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_document_excerpt_chars")]
    pub document_excerpt_chars: usize,
    #[serde(default = "default_reference_sample_rows")]
    pub reference_sample_rows: usize,
    #[serde(default)]
    pub temperature: f32,
}

fn default_document_excerpt_chars() -> usize {
    4000
}

fn default_reference_sample_rows() -> usize {
    5
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            document_excerpt_chars: default_document_excerpt_chars(),
            reference_sample_rows: default_reference_sample_rows(),
            temperature: 0.0,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Provider(String, String),
    Run(String),
    Layout(String),
    Prompt(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Provider(name, msg) => write!(f, "Provider '{}': {}", name, msg),
            ValidationError::Run(msg) => write!(f, "Run: {}", msg),
            ValidationError::Layout(msg) => write!(f, "Layout: {}", msg),
            ValidationError::Prompt(msg) => write!(f, "Prompt: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ParsesmithConfig {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (name, provider) in &self.providers {
            if let Err(e) = provider.validate() {
                errors.push(ValidationError::Provider(name.clone(), e));
            }
        }

        if self.run.max_attempts == 0 {
            errors.push(ValidationError::Run(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if let Some(provider) = &self.run.provider {
            if !self.providers.contains_key(provider) {
                errors.push(ValidationError::Run(format!(
                    "provider '{}' is not defined under [providers]",
                    provider
                )));
            }
        }

        let layout = &self.layout;
        for (name, dir) in [
            ("data_dir", &layout.data_dir),
            ("parsers_dir", &layout.parsers_dir),
            ("templates_dir", &layout.templates_dir),
        ] {
            if dir.as_os_str().is_empty() {
                errors.push(ValidationError::Layout(format!("{} cannot be empty", name)));
            }
        }
        let extension = layout.document_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(|c: char| c == '/' || c == '\\') {
            errors.push(ValidationError::Layout(format!(
                "invalid document_extension '{}'",
                layout.document_extension
            )));
        }

        if !(0.0..=2.0).contains(&self.prompt.temperature) {
            errors.push(ValidationError::Prompt(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.prompt.temperature
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Provider profile for the llm strategy: the named one, or the only one defined
    pub fn provider_for_run(&self, name: Option<&str>) -> Option<(&str, &ProviderConfig)> {
        match name.or(self.run.provider.as_deref()) {
            Some(name) => self
                .providers
                .get_key_value(name)
                .map(|(k, v)| (k.as_str(), v)),
            None if self.providers.len() == 1 => self
                .providers
                .iter()
                .next()
                .map(|(k, v)| (k.as_str(), v)),
            None => None,
        }
    }
}
