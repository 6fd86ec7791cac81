//! Table oracle: decides whether a candidate table matches the reference.
//!
//! Cells are compared after normalization (trimmed text, missing as its own marker).
//! Two present cells whose texts both parse as numbers agree when the numbers are
//! equal, so `310.0`, `310` and `3.1e2` are the same amount.
//! Schema and row order are significant; there is no sorting or reordering tolerance.

use crate::table::{Cell, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell mismatch samples kept in a diff.
pub const MAX_CELL_MISMATCHES: usize = 20;

/// One differing cell, in normalized form (`None` is missing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMismatch {
    pub row: usize,
    pub column: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Why a candidate was ruled not equivalent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableDiff {
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    RowCountMismatch {
        expected: usize,
        actual: usize,
    },
    CellMismatches {
        mismatches: Vec<CellMismatch>,
        total: usize,
    },
}

impl fmt::Display for TableDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableDiff::SchemaMismatch { expected, actual } => write!(
                f,
                "schema mismatch: expected columns [{}], got [{}]",
                expected.join(", "),
                actual.join(", ")
            ),
            TableDiff::RowCountMismatch { expected, actual } => write!(
                f,
                "row count mismatch: expected {} rows, got {}",
                expected, actual
            ),
            TableDiff::CellMismatches { mismatches, total } => {
                write!(f, "{} cell(s) differ", total)?;
                for m in mismatches.iter().take(5) {
                    write!(
                        f,
                        "; row {} column '{}': expected {}, got {}",
                        m.row,
                        m.column,
                        describe(&m.expected),
                        describe(&m.actual)
                    )?;
                }
                if *total > 5 {
                    write!(f, "; ...")?;
                }
                Ok(())
            }
        }
    }
}

fn describe(value: &Option<String>) -> String {
    match value {
        Some(text) => format!("{:?}", text),
        None => "<missing>".to_string(),
    }
}

/// Oracle verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "diff", rename_all = "snake_case")]
pub enum Verdict {
    Equivalent,
    Mismatch(TableDiff),
}

impl Verdict {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Verdict::Equivalent)
    }

    pub fn diff(&self) -> Option<&TableDiff> {
        match self {
            Verdict::Equivalent => None,
            Verdict::Mismatch(diff) => Some(diff),
        }
    }
}

/// Compare a candidate against the reference: schema first, then row count,
/// then every cell in row order.
pub fn compare(candidate: &Table, reference: &Table) -> Verdict {
    if candidate.columns() != reference.columns() {
        return Verdict::Mismatch(TableDiff::SchemaMismatch {
            expected: reference.columns().to_vec(),
            actual: candidate.columns().to_vec(),
        });
    }

    if candidate.row_count() != reference.row_count() {
        return Verdict::Mismatch(TableDiff::RowCountMismatch {
            expected: reference.row_count(),
            actual: candidate.row_count(),
        });
    }

    let mut mismatches = Vec::new();
    let mut total = 0usize;
    for (row_index, (got, want)) in candidate.rows().iter().zip(reference.rows()).enumerate() {
        for (column, (got_cell, want_cell)) in
            reference.columns().iter().zip(got.iter().zip(want))
        {
            let actual = got_cell.normalized();
            let expected = want_cell.normalized();
            if !normalized_agree(&actual, &expected) {
                total += 1;
                if mismatches.len() < MAX_CELL_MISMATCHES {
                    mismatches.push(CellMismatch {
                        row: row_index,
                        column: column.clone(),
                        expected,
                        actual,
                    });
                }
            }
        }
    }

    if total == 0 {
        Verdict::Equivalent
    } else {
        Verdict::Mismatch(TableDiff::CellMismatches { mismatches, total })
    }
}

/// Whether a candidate cell matches a reference cell.
pub fn cells_agree(candidate: &Cell, reference: &Cell) -> bool {
    normalized_agree(&candidate.normalized(), &reference.normalized())
}

fn normalized_agree(actual: &Option<String>, expected: &Option<String>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(b)) if a == b => true,
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x == y,
            _ => false,
        },
        _ => false,
    }
}

/// Boolean form of [`compare`].
pub fn equivalent(candidate: &Table, reference: &Table) -> bool {
    compare(candidate, reference).is_equivalent()
}
