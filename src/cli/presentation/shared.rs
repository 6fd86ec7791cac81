//! Shared presentation: mismatch tables.

use crate::oracle::TableDiff;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

fn cell_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "<missing>".to_string())
}

/// Render a diff for humans: a column comparison, a row count line, or a cell table.
pub fn format_diff_table(diff: &TableDiff) -> String {
    match diff {
        TableDiff::SchemaMismatch { expected, actual } => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["#", "Expected column", "Actual column"]);
            let width = expected.len().max(actual.len());
            for i in 0..width {
                table.add_row(vec![
                    (i + 1).to_string(),
                    expected.get(i).cloned().unwrap_or_else(|| "-".to_string()),
                    actual.get(i).cloned().unwrap_or_else(|| "-".to_string()),
                ]);
            }
            format!("Schema mismatch\n{}", table)
        }
        TableDiff::RowCountMismatch { expected, actual } => {
            format!("Row count mismatch: expected {} rows, got {}", expected, actual)
        }
        TableDiff::CellMismatches { mismatches, total } => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Row", "Column", "Expected", "Actual"]);
            for m in mismatches {
                table.add_row(vec![
                    m.row.to_string(),
                    m.column.clone(),
                    cell_text(&m.expected),
                    cell_text(&m.actual),
                ]);
            }
            let mut out = format!("{} cell(s) differ\n{}", total, table);
            if *total > mismatches.len() {
                out.push_str(&format!("\n({} more not shown)", total - mismatches.len()));
            }
            out
        }
    }
}
