//! Tool output payloads and their size-bounded rendering.
//!
//! Providers return a [`ToolOutput`]; the dispatcher renders it with
//! [`ResultLimits::render`] before it is re-injected into the model context.
//!
//! Truncation rule:
//! 1. Tables keep at most `max_rows` rows, followed by
//!    `[truncated: showing N of M rows]`.
//! 2. The rendered text keeps at most `max_bytes` bytes (cut on a character
//!    boundary), followed by `[truncated: output exceeded B bytes]`.

use crate::core::string::floor_boundary;
use serde::{Deserialize, Serialize};

/// Message returned for a query that matched nothing
pub const EMPTY_RESULT_MESSAGE: &str = "The query returned no results. Try a different question.";

/// Tabular query result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Rows in the full result when `rows` holds only the leading ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
}

impl TabularData {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            total_rows: None,
        }
    }

    pub fn with_row(mut self, row: Vec<serde_json::Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_total_rows(mut self, total: usize) -> Self {
        self.total_rows = Some(total);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Size of the full result, never less than the rows held.
    pub fn total_row_count(&self) -> usize {
        self.total_rows.unwrap_or(0).max(self.rows.len())
    }
}

/// Payload produced by a tool provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ToolOutput {
    Text(String),
    Table(TabularData),
}

/// Size limits applied to tool output before it enters the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLimits {
    max_rows: usize,
    max_bytes: usize,
}

impl ResultLimits {
    pub fn new(max_rows: usize, max_bytes: usize) -> Self {
        Self {
            max_rows,
            max_bytes,
        }
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Render `output` as text within the limits
    pub fn render(&self, output: &ToolOutput) -> String {
        let text = match output {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Table(table) => self.render_table(table),
        };
        self.cap_bytes(text)
    }

    fn render_table(&self, table: &TabularData) -> String {
        if table.rows.is_empty() {
            return EMPTY_RESULT_MESSAGE.to_string();
        }

        let total = table.total_row_count();
        let kept = table.rows.len().min(self.max_rows);
        let body = serde_json::json!({
            "columns": table.columns,
            "data": &table.rows[..kept],
        })
        .to_string();

        if kept < total {
            format!("{}\n[truncated: showing {} of {} rows]", body, kept, total)
        } else {
            body
        }
    }

    fn cap_bytes(&self, text: String) -> String {
        if text.len() <= self.max_bytes {
            return text;
        }
        format!(
            "{}\n[truncated: output exceeded {} bytes]",
            floor_boundary(&text, self.max_bytes),
            self.max_bytes
        )
    }
}

impl Default for ResultLimits {
    /// Default: 20 rows, 16 000 bytes.
    fn default() -> Self {
        Self::new(20, 16_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn region_table(rows: usize) -> TabularData {
        let mut table = TabularData::new(vec!["region".to_string(), "total".to_string()]);
        for i in 0..rows {
            table = table.with_row(vec![json!(format!("REGION_{}", i)), json!(i * 1000)]);
        }
        table
    }

    #[test]
    fn test_render_small_table() {
        let table = TabularData::new(vec!["region".to_string(), "total".to_string()])
            .with_row(vec![json!("EUROPE"), json!(120000)]);
        let text = ResultLimits::default().render(&ToolOutput::Table(table));

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["columns"], json!(["region", "total"]));
        assert_eq!(parsed["data"], json!([["EUROPE", 120000]]));
        assert!(!text.contains("truncated"));
    }

    #[test]
    fn test_render_caps_rows_with_marker() {
        let limits = ResultLimits::new(3, 16_000);
        let text = limits.render(&ToolOutput::Table(region_table(10)));

        let (body, marker) = text.split_once('\n').unwrap();
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(parsed["data"].as_array().unwrap().len(), 3);
        assert_eq!(marker, "[truncated: showing 3 of 10 rows]");
    }

    #[test]
    fn test_render_marker_counts_rows_left_in_the_database() {
        let limits = ResultLimits::new(3, 16_000);
        let text = limits.render(&ToolOutput::Table(region_table(3).with_total_rows(250)));

        let (body, marker) = text.split_once('\n').unwrap();
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(parsed["data"].as_array().unwrap().len(), 3);
        assert_eq!(marker, "[truncated: showing 3 of 250 rows]");
    }

    #[test]
    fn test_total_row_count_never_below_rows_held() {
        assert_eq!(region_table(4).total_row_count(), 4);
        assert_eq!(region_table(4).with_total_rows(2).total_row_count(), 4);
        assert_eq!(region_table(4).with_total_rows(9).total_row_count(), 9);
    }

    #[test]
    fn test_render_empty_table() {
        let text = ResultLimits::default().render(&ToolOutput::Table(region_table(0)));
        assert_eq!(text, EMPTY_RESULT_MESSAGE);
    }

    #[test]
    fn test_render_caps_bytes_with_marker() {
        let limits = ResultLimits::new(20, 10);
        let text = limits.render(&ToolOutput::Text("a".repeat(50)));
        assert_eq!(text, format!("{}\n[truncated: output exceeded 10 bytes]", "a".repeat(10)));
    }

    #[test]
    fn test_render_text_within_limits_is_unchanged() {
        let text = ResultLimits::default().render(&ToolOutput::Text("# Table: orders".into()));
        assert_eq!(text, "# Table: orders");
    }
}
