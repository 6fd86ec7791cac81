//! On-disk slot files.
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the slot, so an interrupted
//! write leaves either the previous content or the new content in place. A stale `.tmp` file
//! may be left behind and is overwritten by the next write.

use crate::error::AgentError;
use crate::slot::SlotContent;
use std::fs;
use std::path::{Path, PathBuf};

/// Origin recorded for content loaded back from disk
pub const DISK_ORIGIN: &str = "disk";

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the slot file at `path` with `content.body`.
pub fn write_slot(path: &Path, content: &SlotContent) -> Result<(), AgentError> {
    let slot_error = |source: std::io::Error| AgentError::SlotWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(slot_error)?;
    }

    let temp = temp_path(path);
    fs::write(&temp, content.body.as_bytes()).map_err(slot_error)?;
    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        slot_error(e)
    })?;
    Ok(())
}

/// Read the slot file at `path`; `None` when no slot has been written yet.
pub fn read_slot(path: &Path) -> Result<Option<SlotContent>, AgentError> {
    match fs::read_to_string(path) {
        Ok(body) => Ok(Some(SlotContent::new(body, DISK_ORIGIN))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AgentError::SlotRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
