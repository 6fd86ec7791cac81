//! Targets and the conventional on-disk layout they select.

use crate::config::LayoutConfig;
use crate::error::AgentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a source-document family (e.g. a bank)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target(String);

impl Target {
    /// Validate a target name. The name is interpolated into file paths, so only
    /// ASCII alphanumerics, `-` and `_` are accepted.
    pub fn new(name: impl Into<String>) -> Result<Self, AgentError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AgentError::InvalidTarget(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Target {
    type Error = AgentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Target::new(value)
    }
}

impl From<Target> for String {
    fn from(value: Target) -> Self {
        value.0
    }
}

impl std::str::FromStr for Target {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::new(s)
    }
}

/// Resolved paths for one target under a workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    pub target: Target,
    pub document: PathBuf,
    pub reference: PathBuf,
    pub slot: PathBuf,
    pub template: PathBuf,
}

impl TargetLayout {
    /// `data/<t>/<t>_sample.<ext>`, `data/<t>/<t>_sample.csv`,
    /// `custom_parsers/<t>_parser.toml` and `templates/<t>.toml`, each relative
    /// to the workspace root unless configured as absolute.
    pub fn resolve(workspace_root: &Path, layout: &LayoutConfig, target: &Target) -> Self {
        let root = dunce::canonicalize(workspace_root)
            .unwrap_or_else(|_| workspace_root.to_path_buf());
        let data_dir = root.join(&layout.data_dir).join(target.as_str());
        let extension = layout.document_extension.trim_start_matches('.');
        Self {
            target: target.clone(),
            document: data_dir.join(format!("{}_sample.{}", target, extension)),
            reference: data_dir.join(format!("{}_sample.csv", target)),
            slot: root
                .join(&layout.parsers_dir)
                .join(format!("{}_parser.toml", target)),
            template: root.join(&layout.templates_dir).join(format!("{}.toml", target)),
        }
    }

    /// Fail fast when the run inputs are absent.
    pub fn ensure_inputs(&self) -> Result<(), AgentError> {
        if !self.reference.is_file() {
            return Err(AgentError::ReferenceNotFound(self.reference.clone()));
        }
        if !self.document.is_file() {
            return Err(AgentError::DocumentNotFound(self.document.clone()));
        }
        Ok(())
    }
}
