//! Shared test utilities for integration tests
//!
//! Builds throwaway workspaces with the conventional data/, templates/ and
//! custom_parsers/ layout, and serializes environment variable access.

use parsesmith::config::{LayoutConfig, ParsesmithConfig};
use parking_lot::Mutex;
use parsesmith::target::{Target, TargetLayout};
use std::path::Path;
use tempfile::TempDir;

/// Global mutex to serialize HOME / PARSESMITH_* access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// A statement rendered as plain text, the way the PDF reader would hand it over
pub const STATEMENT_TEXT: &str = "\
ICICI Bank Statement
Date Description Debit Amt Credit Amt Balance
01-08-2024 Salary Credit XYZ Pvt Ltd - 1,935.30 6,864.58
02-08-2024 Cheque Withdrawal 1,652.61 - 5,211.97
03-08-2024 UPI Payment Grocery 310 - 4,901.97
Page 1 of 1
";

/// Ground truth for [`STATEMENT_TEXT`], as pandas would write it
pub const STATEMENT_CSV: &str = "\
Date,Description,Debit Amt,Credit Amt,Balance
01-08-2024,Salary Credit XYZ Pvt Ltd,,1935.3,6864.58
02-08-2024,Cheque Withdrawal,1652.61,,5211.97
03-08-2024,UPI Payment Grocery,310.0,,4901.97
";

/// A recipe that reproduces [`STATEMENT_CSV`] from [`STATEMENT_TEXT`]
pub const GOOD_RECIPE: &str = r#"
columns = ["Date", "Description", "Debit Amt", "Credit Amt", "Balance"]
row_pattern = '^(\d{2}-\d{2}-\d{4})\s+(.+?)\s+([\d,.]+|-)\s+([\d,.]+|-)\s+([\d,.]+)$'
missing_values = ["", "-"]

[column_types]
"Debit Amt" = "number"
"Credit Amt" = "number"
Balance = "number"
"#;

/// Parses, but names a column wrong
pub const WRONG_SCHEMA_RECIPE: &str = r#"
columns = ["Date", "Description", "Debit", "Credit", "Balance"]
row_pattern = '^(\d{2}-\d{2}-\d{4})\s+(.+?)\s+([\d,.]+|-)\s+([\d,.]+|-)\s+([\d,.]+)$'
missing_values = ["", "-"]
"#;

/// A temp workspace holding one target's document and reference table.
/// Documents are plain text so no PDF is needed.
pub struct TestWorkspace {
    pub temp: TempDir,
    pub target: Target,
    pub layout: TargetLayout,
}

impl TestWorkspace {
    pub fn new(target: &str) -> Self {
        Self::with_inputs(target, STATEMENT_TEXT, STATEMENT_CSV)
    }

    pub fn with_inputs(target: &str, document: &str, reference: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let target = Target::new(target).unwrap();
        let layout = TargetLayout::resolve(temp.path(), &layout_config(), &target);
        write_file(&layout.document, document);
        write_file(&layout.reference, reference);
        Self {
            temp,
            target,
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn write_template(&self, body: &str) {
        write_file(&self.layout.template, body);
    }

    pub fn write_slot(&self, body: &str) {
        write_file(&self.layout.slot, body);
    }

    pub fn slot_body(&self) -> String {
        std::fs::read_to_string(&self.layout.slot).unwrap()
    }

    pub fn config(&self) -> ParsesmithConfig {
        ParsesmithConfig {
            layout: layout_config(),
            ..ParsesmithConfig::default()
        }
    }
}

pub fn layout_config() -> LayoutConfig {
    LayoutConfig {
        document_extension: "txt".to_string(),
        ..LayoutConfig::default()
    }
}

pub fn write_file(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, body).unwrap();
}

/// Run `f` with HOME pointing at `home` and the given PARSESMITH variables set,
/// restoring the previous environment afterwards.
pub fn with_isolated_env<F, R>(home: &Path, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    let original_home = std::env::var_os("HOME");
    let originals: Vec<_> = vars
        .iter()
        .map(|(key, _)| (*key, std::env::var_os(key)))
        .collect();

    std::env::set_var("HOME", home);
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (key, value) in originals {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    match original_home {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
    result
}
