//! Progress reporting while a turn runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sales_agent_application::TurnProgressNotifier;
use sales_agent_domain::{ToolCall, ToolResult, TurnPhase};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner while waiting for the model and echoes tool activity
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    show_tool_calls: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            show_tool_calls: true,
        }
    }

    pub fn with_tool_calls(mut self, show: bool) -> Self {
        self.show_tool_calls = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, message: String) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        if let Some(old) = slot.take() {
            old.finish_and_clear();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        *slot = Some(pb);
    }

    fn clear_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Print a line without tearing the spinner
    fn print(&self, line: &str) {
        self.clear_spinner();
        println!("{}", line);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_phase_change(&self, phase: TurnPhase) {
        if phase.is_terminal() {
            self.clear_spinner();
        }
    }

    fn on_model_request(&self, request_number: usize) {
        let message = if request_number <= 1 {
            "Thinking...".to_string()
        } else {
            format!("Thinking... (request {})", request_number)
        };
        self.start_spinner(message);
    }

    fn on_assistant_text(&self, text: &str) {
        if !text.trim().is_empty() {
            self.print(&ConsoleFormatter::assistant_text(text));
        }
    }

    fn on_tool_call(&self, call: &ToolCall) {
        if self.show_tool_calls {
            self.print(&ConsoleFormatter::tool_call(call));
        }
    }

    fn on_tool_result(&self, result: &ToolResult) {
        if self.show_tool_calls {
            self.print(&ConsoleFormatter::tool_result(result));
        }
    }

    fn on_context_trimmed(&self, removed: usize) {
        self.print(&format!(
            "{}",
            format!("(dropped {} old messages to fit the context window)", removed).dimmed()
        ));
    }

    fn on_round_trip_limit(&self, max_round_trips: usize) {
        self.print(&format!(
            "{} {}",
            "!".yellow().bold(),
            format!("Stopped after {} tool round trips", max_round_trips).yellow()
        ));
    }
}

/// Plain progress without a spinner, for non-interactive output
pub struct SimpleProgress {
    show_tool_calls: bool,
}

impl SimpleProgress {
    pub fn new(show_tool_calls: bool) -> Self {
        Self { show_tool_calls }
    }
}

impl TurnProgressNotifier for SimpleProgress {
    fn on_tool_call(&self, call: &ToolCall) {
        if self.show_tool_calls {
            eprintln!("{}", ConsoleFormatter::tool_call(call));
        }
    }

    fn on_tool_result(&self, result: &ToolResult) {
        if self.show_tool_calls {
            eprintln!("{}", ConsoleFormatter::tool_result(result));
        }
    }

    fn on_round_trip_limit(&self, max_round_trips: usize) {
        eprintln!("Stopped after {} tool round trips", max_round_trips);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let reporter = ProgressReporter::new().with_tool_calls(false);
        reporter.on_model_request(1);
        assert!(reporter.spinner.lock().unwrap().is_some());
        reporter.on_model_request(2);
        assert!(reporter.spinner.lock().unwrap().is_some());
        reporter.on_phase_change(TurnPhase::Answered);
        assert!(reporter.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_tool_echo_clears_spinner() {
        let reporter = ProgressReporter::new();
        reporter.on_model_request(1);
        reporter.on_tool_call(&ToolCall::new("c1", "get_database_schema"));
        assert!(reporter.spinner.lock().unwrap().is_none());
    }
}
