//! Presentation-level configuration

use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Echo tool calls and result summaries while a turn runs
    pub show_tool_calls: bool,
    /// Show the spinner while waiting for the model
    pub show_progress: bool,
    /// Path to history file (defaults to the platform data directory)
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_tool_calls: true,
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("sales-agent").join("history.txt")))
    }
}
