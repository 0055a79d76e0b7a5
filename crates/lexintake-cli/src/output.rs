//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use lexintake_domain::record::RecordSet;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    json: bool,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(json: bool, color_enabled: bool) -> Self {
        Self {
            json,
            color_enabled,
        }
    }

    /// Format the stored record set.
    pub fn format_records(&self, set: &RecordSet, limit: Option<usize>) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(set)?);
        }
        self.format_records_table(set, limit)
    }

    /// Format records as a table, columns in the persisted display order.
    fn format_records_table(&self, set: &RecordSet, limit: Option<usize>) -> Result<String> {
        if set.documents.is_empty() {
            return Ok(self.colorize("No documents stored.", "yellow"));
        }

        let columns = if set.column_order.is_empty() {
            set.documents[0].column_keys()
        } else {
            set.column_order.clone()
        };

        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(String::as_str));

        let shown = limit.unwrap_or(set.documents.len());
        for record in set.documents.iter().take(shown) {
            builder.push_record(
                columns
                    .iter()
                    .map(|key| record.column_value(key).unwrap_or("")),
            );
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format the column order as a numbered list.
    pub fn format_columns(&self, set: &RecordSet) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(&set.column_order)?);
        }
        if set.column_order.is_empty() {
            return Ok(self.colorize("No columns yet; upload a document first.", "yellow"));
        }

        let lines: Vec<String> = set
            .column_order
            .iter()
            .enumerate()
            .map(|(i, key)| format!("{:>3}  {}", i, key))
            .collect();
        Ok(lines.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
