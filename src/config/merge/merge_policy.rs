//! Merge rules: defaults first, later sources override earlier ones key by key.

use crate::controller::DEFAULT_MAX_ATTEMPTS;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in defaults as the lowest layer.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("run.max_attempts", DEFAULT_MAX_ATTEMPTS as i64)?
        .set_default("run.strategy", "template")?
        .set_default("layout.data_dir", "data")?
        .set_default("layout.parsers_dir", "custom_parsers")?
        .set_default("layout.templates_dir", "templates")?
        .set_default("layout.document_extension", "pdf")
}
