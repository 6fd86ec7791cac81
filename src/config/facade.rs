//! Config loader: assembles the layered sources and deserializes the result.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::ParsesmithConfig;
use crate::error::AgentError;
use config::File;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the user file, then workspace files, then the environment.
    pub fn load(workspace_root: &Path) -> Result<ParsesmithConfig, AgentError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder);
        let builder = workspace_file::add_to_builder(builder, workspace_root);
        let builder = environment::add_to_builder(builder);

        let config = Self::finish(builder.build()?.try_deserialize::<ParsesmithConfig>()?);
        debug!(
            workspace = %workspace_root.display(),
            providers = config.providers.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// An explicit file replaces the file layers; defaults and environment still apply.
    pub fn load_from_file(path: &Path) -> Result<ParsesmithConfig, AgentError> {
        if !path.exists() {
            return Err(AgentError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        Ok(Self::finish(
            builder.build()?.try_deserialize::<ParsesmithConfig>()?,
        ))
    }

    fn finish(mut config: ParsesmithConfig) -> ParsesmithConfig {
        for (name, provider) in config.providers.iter_mut() {
            if provider.provider_name.is_none() {
                provider.provider_name = Some(name.clone());
            }
        }
        config
    }
}
