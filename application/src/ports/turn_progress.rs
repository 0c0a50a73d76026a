//! Turn progress port.
//!
//! [`TurnProgressNotifier`] is an output port the presentation layer
//! implements to show what a turn is doing while it runs.
//! All methods have default no-op implementations.

use sales_agent_domain::{ToolCall, ToolResult, TurnPhase};

pub trait TurnProgressNotifier: Send + Sync {
    /// Called on every turn state transition
    fn on_phase_change(&self, _phase: TurnPhase) {}

    /// Called before each model endpoint request (1-based)
    fn on_model_request(&self, _request_number: usize) {}

    /// Called with text the model sent alongside tool calls
    fn on_assistant_text(&self, _text: &str) {}

    /// Called when a tool call is dispatched
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called when a tool call resolves, in request order
    fn on_tool_result(&self, _result: &ToolResult) {}

    /// Called when old messages were dropped to fit the context budget
    fn on_context_trimmed(&self, _removed: usize) {}

    /// Called when the round-trip cap ends the turn
    fn on_round_trip_limit(&self, _max_round_trips: usize) {}
}

/// No-op progress notifier
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}
