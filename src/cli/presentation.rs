//! CLI presentation: console progress and text/json formatters per command.

mod check;
mod run;
mod shared;

pub use check::{format_check_result_json, format_check_result_text};
pub use run::{format_run_report_json, format_run_report_text, ConsoleObserver};
pub use shared::format_diff_table;
