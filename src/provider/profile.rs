//! Provider profiles: the `[providers.<name>]` config sections.

use crate::error::AgentError;
use crate::provider::{CompletionOptions, ModelProvider};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Anthropic,
    Ollama,
    #[serde(alias = "local_custom")]
    Local,
}

impl ProviderType {
    /// Environment variable consulted when neither `api_key` nor `api_key_env` is set
    pub fn default_api_key_env(self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderType::Ollama | ProviderType::Local => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Filled from the table key when loaded from config
    #[serde(default)]
    pub provider_name: Option<String>,
    pub provider_type: ProviderType,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Name of the environment variable holding the key
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub default_options: CompletionOptions,
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            let has_scheme = endpoint.starts_with("http://") || endpoint.starts_with("https://");
            if !has_scheme {
                return Err(format!(
                    "Endpoint must start with http:// or https://: {}",
                    endpoint
                ));
            }
        }
        if self.provider_type == ProviderType::Local && self.endpoint.is_none() {
            return Err("Local providers require an endpoint".to_string());
        }
        if let Some(temperature) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temperature
                ));
            }
        }
        Ok(())
    }

    /// Explicit key, then the named env variable, then the provider's default variable
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Some(key.clone());
        }
        let var = self
            .api_key_env
            .as_deref()
            .or_else(|| self.provider_type.default_api_key_env())?;
        std::env::var(var).ok().filter(|k| !k.is_empty())
    }

    pub fn to_model_provider(&self) -> Result<ModelProvider, AgentError> {
        let model = self.model.clone();
        let require_key = || {
            self.resolve_api_key().ok_or_else(|| {
                let source = self
                    .api_key_env
                    .as_deref()
                    .or_else(|| self.provider_type.default_api_key_env())
                    .unwrap_or("api_key");
                AgentError::ConfigError(format!(
                    "No API key for provider '{}': set api_key or {}",
                    self.provider_name.as_deref().unwrap_or(&self.model),
                    source
                ))
            })
        };

        Ok(match self.provider_type {
            ProviderType::OpenAI => ModelProvider::OpenAI {
                model,
                api_key: require_key()?,
                base_url: self.endpoint.clone(),
            },
            ProviderType::Anthropic => ModelProvider::Anthropic {
                model,
                api_key: require_key()?,
            },
            ProviderType::Ollama => ModelProvider::Ollama {
                model,
                base_url: self.endpoint.clone(),
            },
            ProviderType::Local => ModelProvider::LocalCustom {
                model,
                endpoint: self.endpoint.clone().ok_or_else(|| {
                    AgentError::ConfigError("Local providers require an endpoint".to_string())
                })?,
                api_key: self.resolve_api_key(),
            },
        })
    }
}
