//! Prompt assembly for the LLM strategy, and recipe extraction from its replies.

use crate::config::PromptConfig;
use crate::provider::ChatMessage;
use crate::strategy::ProposalRequest;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = r#"You write parser recipes that turn the text of a bank statement into a table.
A recipe is TOML with these keys:

columns        ordered list of output column names, exactly as in the expected table
row_pattern    regular expression (Rust regex syntax) matched against each line of the
               document text; capture group i fills column i, so the pattern must have
               exactly one capture group per column. Use optional groups for cells that
               may be absent. Prefer single-quoted TOML literal strings for the pattern.
skip_lines     number of leading lines to ignore (default 0)
missing_values captured values (after trimming) that mean "no value" (default [""])
column_types   table mapping column name to "text", "number" or "date" (default text)
date_format    strftime format for date columns (default "%d-%m-%Y")

Lines that do not match row_pattern are ignored. Reply with a single ```toml fenced
block containing the complete recipe and nothing else."#;

/// Builds the message list for one proposal
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    document_excerpt_chars: usize,
    reference_sample_rows: usize,
}

impl PromptBuilder {
    pub fn new(config: &PromptConfig) -> Self {
        Self {
            document_excerpt_chars: config.document_excerpt_chars,
            reference_sample_rows: config.reference_sample_rows,
        }
    }

    pub fn messages(&self, request: &ProposalRequest<'_>, document_text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(self.user_prompt(request, document_text)),
        ]
    }

    fn user_prompt(&self, request: &ProposalRequest<'_>, document_text: &str) -> String {
        let reference = request.reference;
        let mut prompt = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(
            prompt,
            "Target: {} (attempt {} of {})",
            request.target(),
            request.attempt,
            request.max_attempts
        );
        let _ = writeln!(
            prompt,
            "\nExpected columns: {}",
            reference.columns().join(", ")
        );
        let _ = writeln!(prompt, "Expected row count: {}", reference.row_count());
        let _ = writeln!(
            prompt,
            "\nFirst rows of the expected table (CSV):\n{}",
            reference.to_csv_string(Some(self.reference_sample_rows))
        );
        let _ = writeln!(
            prompt,
            "Document text:\n-----\n{}\n-----",
            excerpt(document_text, self.document_excerpt_chars)
        );

        if let Some(previous) = request.previous() {
            let _ = writeln!(
                prompt,
                "\nYour previous recipe (attempt {}):\n```toml\n{}\n```",
                previous.attempt,
                previous.content.body.trim_end()
            );
            if let Some(feedback) = previous.feedback() {
                let _ = writeln!(prompt, "It failed: {}", feedback);
            }
            prompt.push_str("Fix the recipe so its output matches the expected table exactly.\n");
        }

        prompt
    }
}

/// First `max_chars` characters, marked when truncated
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}\n[... truncated ...]", &text[..cut]),
        None => text.to_string(),
    }
}

/// The first ```toml fenced block of a reply, else the first fenced block, else the reply.
pub fn extract_recipe(reply: &str) -> String {
    fenced_block(reply, Some("toml"))
        .or_else(|| fenced_block(reply, None))
        .unwrap_or_else(|| reply.trim().to_string())
}

fn fenced_block(reply: &str, language: Option<&str>) -> Option<String> {
    let mut lines = reply.lines();
    loop {
        let line = lines.next()?.trim_start();
        let Some(info) = line.strip_prefix("```") else {
            continue;
        };
        if language.map_or(true, |lang| info.trim().eq_ignore_ascii_case(lang)) {
            break;
        }
    }
    let mut block = Vec::new();
    for line in lines {
        if line.trim_start().starts_with("```") {
            return Some(block.join("\n"));
        }
        block.push(line);
    }
    // Unterminated fence: take the rest
    Some(block.join("\n"))
}
