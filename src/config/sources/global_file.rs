//! User config file source: ~/.config/parsesmith/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use std::path::PathBuf;
use tracing::debug;

/// Path to the user config file, `None` when HOME is unset.
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").filter(|home| !home.is_empty()).map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("parsesmith")
            .join("config.toml")
    })
}

/// Add the user config file to the builder if it exists.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) if path.exists() => {
            let path = dunce::canonicalize(&path).unwrap_or(path);
            builder.add_source(File::from(path).required(false))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "No user configuration file");
            builder
        }
        None => builder,
    }
}
