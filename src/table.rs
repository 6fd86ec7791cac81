//! Tables: the common output contract of every parser and the shape of reference data.

use crate::error::TableError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Tokens read as missing values in reference CSVs (the usual dataframe NA set).
pub const DEFAULT_MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A scalar table value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Normalized form used for comparison: `None` is the missing marker,
    /// everything else is its trimmed text representation.
    pub fn normalized(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Text(text) => Some(text.trim().to_string()),
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.normalized().is_none()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Missing)
    }
}

/// Ordered rows of named-column values with a fixed schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, rejecting duplicate column names and rows that do not
    /// match the schema width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(TableError::DuplicateColumn(column.clone()));
            }
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidth {
                    row: index,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Table with no columns and no rows
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a delimited table with a header row. Fields equal to one of
    /// [`DEFAULT_MISSING_TOKENS`] become [`Cell::Missing`]; every other field keeps
    /// its source text.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);
        let columns = rdr
            .headers()
            .map_err(|e| TableError::Csv(e.to_string()))?
            .iter()
            .map(|column| column.to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| TableError::Csv(e.to_string()))?;
            let row = record
                .iter()
                .map(|field| {
                    if DEFAULT_MISSING_TOKENS.contains(&field) {
                        Cell::Missing
                    } else {
                        Cell::text(field)
                    }
                })
                .collect::<Vec<_>>();
            rows.push(row);
        }

        Table::new(columns, rows)
    }

    pub fn read_csv(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)
            .map_err(|e| TableError::Csv(format!("Failed to open {}: {}", path.display(), e)))?;
        Self::from_csv_reader(file)
    }

    /// Render the header and up to `max_rows` rows as CSV. Missing cells are written empty.
    pub fn to_csv_string(&self, max_rows: Option<usize>) -> String {
        let mut wtr = csv::WriterBuilder::new().from_writer(Vec::new());
        let limit = max_rows.unwrap_or(self.rows.len());
        // Writing into a Vec<u8> cannot fail on I/O; record errors are skipped.
        let _ = wtr.write_record(&self.columns);
        for row in self.rows.iter().take(limit) {
            let fields = row
                .iter()
                .map(|cell| cell.normalized().unwrap_or_default())
                .collect::<Vec<_>>();
            let _ = wtr.write_record(&fields);
        }
        let bytes = wtr.into_inner().unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
