//! Console output formatting for turns and tool activity

use colored::Colorize;
use sales_agent_application::{RunTurnError, TurnOutput};
use sales_agent_domain::core::string::{single_line, truncate};
use sales_agent_domain::{ToolCall, ToolDefinition, ToolResult};

/// Maximum length of a tool error shown in the console
const MAX_ERROR_DISPLAY: usize = 200;

/// Formats session output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner shown when the chat starts
    pub fn welcome(model: &str, tools: &[ToolDefinition]) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(&Self::header("Sales Agent - Chat Mode"));
        output.push_str("\n\n");
        output.push_str(&format!("{} {}\n\n", "Model:".cyan().bold(), model));
        output.push_str(&Self::tool_list(tools));
        output.push('\n');
        output.push_str(&Self::help());
        output.push_str(&format!("\nType '{}' to quit.\n", "exit".bold()));
        output
    }

    /// Tools advertised to the model, one per line
    pub fn tool_list(tools: &[ToolDefinition]) -> String {
        let mut output = format!("{}\n", "Available tools:".cyan().bold());
        for tool in tools {
            output.push_str(&format!(
                "  - {}: {}\n",
                tool.name.bold(),
                Self::first_sentence(&tool.description)
            ));
        }
        output
    }

    pub fn help() -> String {
        let mut output = format!("{}\n", "Commands:".cyan().bold());
        output.push_str("  /help, /h, /?      - Show this help\n");
        output.push_str("  /tools             - List available tools\n");
        output.push_str("  /reset             - Start a new conversation\n");
        output.push_str("  /quit, /exit, /q   - Exit chat\n");
        output
    }

    /// The final answer of a turn
    pub fn answer(output: &TurnOutput) -> String {
        let mut text = String::new();
        if output.limit_reached {
            text.push_str(&format!("{}\n", output.answer.yellow()));
        } else {
            text.push_str(&output.answer);
            text.push('\n');
        }
        if output.round_trips > 0 {
            text.push_str(&format!(
                "{}\n",
                format!(
                    "({} tool round trip{})",
                    output.round_trips,
                    if output.round_trips == 1 { "" } else { "s" }
                )
                .dimmed()
            ));
        }
        text
    }

    /// Text the model sent alongside its tool calls
    pub fn assistant_text(text: &str) -> String {
        text.trim().italic().to_string()
    }

    /// A dispatched tool call. Queries are shown verbatim on a blue background.
    pub fn tool_call(call: &ToolCall) -> String {
        match call.get_string("query") {
            Some(query) => format!(
                "{} {}\n{}",
                "->".cyan(),
                call.tool_name.bold(),
                format!(" {} ", query).white().on_blue()
            ),
            None if call.arguments.is_empty() && call.malformed_arguments.is_none() => {
                format!("{} {}", "->".cyan(), call.tool_name.bold())
            }
            None => format!(
                "{} {} {}",
                "->".cyan(),
                call.tool_name.bold(),
                call.arguments_json().dimmed()
            ),
        }
    }

    pub fn tool_result(result: &ToolResult) -> String {
        let elapsed = result
            .duration_ms
            .map(|ms| format!(" ({} ms)", ms))
            .unwrap_or_default();

        if let Some(error) = result.error() {
            format!(
                "  {} {}{}: [{}] {}",
                "x".red(),
                result.tool_name,
                elapsed,
                error.code.red(),
                truncate(&single_line(&error.message), MAX_ERROR_DISPLAY)
            )
        } else {
            let bytes = result.output().map(str::len).unwrap_or(0);
            format!(
                "  {} {}{}: {} bytes",
                "v".green(),
                result.tool_name,
                elapsed,
                bytes
            )
        }
    }

    pub fn turn_error(error: &RunTurnError) -> String {
        match error {
            RunTurnError::Cancelled => format!("{}", "Cancelled.".yellow()),
            other => format!("{} {}", "Error:".red().bold(), other),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(48);
        format!("{}\n{:^48}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn first_sentence(text: &str) -> &str {
        match text.find(". ") {
            Some(end) => &text[..=end],
            None => text,
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
