//! CLI output: error mapping and exit codes.

use crate::error::AgentError;

/// The run succeeded or the current parser matches
pub const EXIT_SUCCESS: i32 = 0;
/// Retries exhausted, or the checked parser does not match
pub const EXIT_FAILURE: i32 = 1;
/// Environment fault or configuration error
pub const EXIT_FAULT: i32 = 2;

/// Rendered command output plus the process exit code it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn new(text: String, success: bool) -> Self {
        Self {
            text,
            exit_code: if success { EXIT_SUCCESS } else { EXIT_FAILURE },
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == EXIT_SUCCESS
    }
}

/// Map a fault to the message shown on stderr.
pub fn map_error(e: &AgentError) -> String {
    format!("Error: {}", e)
}
