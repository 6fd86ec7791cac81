//! Document text readers used by parser slots.

use crate::error::ParseFailure;
use std::path::Path;
use tracing::debug;

/// Produces the plain text of a statement document
pub trait DocumentReader: Send + Sync {
    fn read_text(&self, path: &Path) -> Result<String, ParseFailure>;
}

/// Reads UTF-8 text files as-is
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextReader;

impl DocumentReader for PlainTextReader {
    fn read_text(&self, path: &Path) -> Result<String, ParseFailure> {
        std::fs::read_to_string(path).map_err(|e| {
            ParseFailure::document(format!("Failed to read {}: {}", path.display(), e))
        })
    }
}

/// Extracts text from PDF files with `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextReader;

impl DocumentReader for PdfTextReader {
    fn read_text(&self, path: &Path) -> Result<String, ParseFailure> {
        let bytes = std::fs::read(path).map_err(|e| {
            ParseFailure::document(format!("Failed to read {}: {}", path.display(), e))
        })?;
        // pdf-extract panics on some malformed inputs.
        let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
            .map_err(|_| {
                ParseFailure::document(format!(
                    "PDF text extraction panicked for {}",
                    path.display()
                ))
            })?;
        let text = extracted.map_err(|e| {
            ParseFailure::document(format!(
                "PDF text extraction failed for {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), bytes = text.len(), "PDF text extracted");
        Ok(text)
    }
}

/// Dispatches on file extension: `.pdf` through [`PdfTextReader`], anything else as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionReader;

impl DocumentReader for ExtensionReader {
    fn read_text(&self, path: &Path) -> Result<String, ParseFailure> {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            PdfTextReader.read_text(path)
        } else {
            PlainTextReader.read_text(path)
        }
    }
}
