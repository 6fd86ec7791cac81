//! CLI domain: parse, route, output, and presentation only.
//! Orchestration lives in the controller; the route table only wires it up.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, CommandOutput, EXIT_FAILURE, EXIT_FAULT, EXIT_SUCCESS};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_check_result_json, format_check_result_text, format_diff_table,
    format_run_report_json, format_run_report_text, ConsoleObserver,
};
pub use route::RunContext;
