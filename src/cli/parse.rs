//! CLI parse: clap types for parsesmith. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parsesmith - generate bank statement parsers and check them against reference tables
#[derive(Parser, Debug)]
#[command(name = "parsesmith")]
#[command(about = "Generate bank statement parsers, retrying until output matches a reference CSV")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces user and workspace config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate, test and retry a parser for a target
    Run {
        /// Target name, e.g. icici
        #[arg(long)]
        target: String,
        /// Generation strategy (template or llm)
        #[arg(long)]
        strategy: Option<String>,
        /// Provider profile for the llm strategy
        #[arg(long)]
        provider: Option<String>,
        /// Failed attempts allowed before giving up
        #[arg(long)]
        max_attempts: Option<u32>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Test the parser currently on disk once, without regenerating it
    Check {
        /// Target name, e.g. icici
        #[arg(long)]
        target: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Commands {
    pub fn target(&self) -> &str {
        match self {
            Commands::Run { target, .. } | Commands::Check { target, .. } => target,
        }
    }

    pub fn format(&self) -> &str {
        match self {
            Commands::Run { format, .. } | Commands::Check { format, .. } => format,
        }
    }
}
