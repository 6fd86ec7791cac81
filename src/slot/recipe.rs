//! Declarative parser recipes.
//!
//! A recipe is TOML naming the output columns and a line pattern whose capture groups fill
//! those columns, in order:
//!
//! ```toml
//! columns = ["Date", "Description", "Debit Amt", "Credit Amt", "Balance"]
//! row_pattern = '^(\d{2}-\d{2}-\d{4})\s+(.+?)\s+([\d,.]+)?\s+([\d,.]+)?\s+([\d,.]+)$'
//! skip_lines = 1
//! missing_values = ["", "-"]
//!
//! [column_types]
//! Balance = "number"
//! ```

use crate::document::DocumentReader;
use crate::error::ParseFailure;
use crate::slot::{Parser, SlotCompiler, SlotContent};
use crate::table::{Cell, Table};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// How a captured value becomes a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserRecipe {
    pub columns: Vec<String>,
    pub row_pattern: String,
    #[serde(default)]
    pub skip_lines: usize,
    #[serde(default = "default_missing_values")]
    pub missing_values: Vec<String>,
    #[serde(default)]
    pub column_types: BTreeMap<String, ColumnType>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_missing_values() -> Vec<String> {
    vec![String::new()]
}

fn default_date_format() -> String {
    "%d-%m-%Y".to_string()
}

impl ParserRecipe {
    pub fn from_toml(body: &str) -> Result<Self, ParseFailure> {
        toml::from_str(body)
            .map_err(|e| ParseFailure::recipe(format!("Invalid recipe TOML: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String, ParseFailure> {
        toml::to_string_pretty(self)
            .map_err(|e| ParseFailure::recipe(format!("Failed to serialize recipe: {}", e)))
    }

    /// Check the recipe and compile its pattern.
    pub fn validate(&self) -> Result<Regex, ParseFailure> {
        if self.columns.is_empty() {
            return Err(ParseFailure::recipe("Recipe declares no columns"));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(ParseFailure::recipe(format!(
                    "Recipe declares column '{}' more than once",
                    column
                )));
            }
        }
        for column in self.column_types.keys() {
            if !seen.contains(column.as_str()) {
                return Err(ParseFailure::recipe(format!(
                    "column_types names unknown column '{}'",
                    column
                )));
            }
        }
        if self.date_format.trim().is_empty() {
            return Err(ParseFailure::recipe("date_format cannot be empty"));
        }

        let pattern = Regex::new(&self.row_pattern)
            .map_err(|e| ParseFailure::recipe(format!("Invalid row_pattern: {}", e)))?;
        let groups = pattern.captures_len() - 1;
        if groups != self.columns.len() {
            return Err(ParseFailure::recipe(format!(
                "row_pattern has {} capture group(s) but the recipe declares {} column(s)",
                groups,
                self.columns.len()
            )));
        }
        Ok(pattern)
    }

    fn column_type(&self, column: &str) -> ColumnType {
        self.column_types.get(column).copied().unwrap_or_default()
    }
}

/// Parser backed by a validated recipe
pub struct RecipeParser {
    recipe: ParserRecipe,
    pattern: Regex,
    types: Vec<ColumnType>,
    reader: Arc<dyn DocumentReader>,
}

impl RecipeParser {
    pub fn new(
        recipe: ParserRecipe,
        reader: Arc<dyn DocumentReader>,
    ) -> Result<Self, ParseFailure> {
        let pattern = recipe.validate()?;
        let types = recipe
            .columns
            .iter()
            .map(|column| recipe.column_type(column))
            .collect();
        Ok(Self {
            recipe,
            pattern,
            types,
            reader,
        })
    }

    /// Apply the recipe to already-extracted document text.
    pub fn parse_text(&self, text: &str) -> Result<Table, ParseFailure> {
        let mut rows = Vec::new();
        for line in text.lines().skip(self.recipe.skip_lines) {
            let Some(captures) = self.pattern.captures(line) else {
                continue;
            };
            let row = self
                .types
                .iter()
                .enumerate()
                .map(|(index, column_type)| {
                    let raw = captures.get(index + 1).map(|m| m.as_str());
                    self.convert(raw, *column_type)
                })
                .collect::<Vec<_>>();
            rows.push(row);
        }
        Ok(Table::new(self.recipe.columns.clone(), rows)?)
    }

    fn convert(&self, raw: Option<&str>, column_type: ColumnType) -> Cell {
        let Some(value) = raw.map(str::trim) else {
            return Cell::Missing;
        };
        if self.recipe.missing_values.iter().any(|m| m.trim() == value) {
            return Cell::Missing;
        }
        match column_type {
            ColumnType::Text => Cell::text(value),
            ColumnType::Number => value
                .replace(',', "")
                .parse::<f64>()
                .map(Cell::Number)
                .unwrap_or(Cell::Missing),
            ColumnType::Date => NaiveDate::parse_from_str(value, &self.recipe.date_format)
                .map(Cell::Date)
                .unwrap_or(Cell::Missing),
        }
    }
}

impl Parser for RecipeParser {
    fn parse(&self, document: &Path) -> Result<Table, ParseFailure> {
        let text = self.reader.read_text(document)?;
        self.parse_text(&text)
    }
}

/// Compiles recipe slot content against a document reader
pub struct RecipeCompiler {
    reader: Arc<dyn DocumentReader>,
}

impl RecipeCompiler {
    pub fn new(reader: Arc<dyn DocumentReader>) -> Self {
        Self { reader }
    }
}

impl SlotCompiler for RecipeCompiler {
    fn compile(&self, content: &SlotContent) -> Result<Arc<dyn Parser>, ParseFailure> {
        let recipe = ParserRecipe::from_toml(&content.body)?;
        let parser = RecipeParser::new(recipe, Arc::clone(&self.reader))?;
        Ok(Arc::new(parser))
    }
}
