//! Command names for log spans.

use crate::cli::parse::Commands;

pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Run { .. } => "run",
        Commands::Check { .. } => "check",
    }
}
