//! Execution parameters for the turn loop.
//!
//! [`ExecutionParams`] groups the static parameters that control the turn
//! loop in [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase)
//! and the [`ToolDispatcher`](crate::use_cases::dispatch_tool::ToolDispatcher).
//! These are application-layer concerns, not domain policy.

use sales_agent_domain::{ContextBudget, ResultLimits};
use std::time::Duration;

/// Turn loop control parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionParams {
    /// Maximum tool round trips in a single turn.
    pub max_round_trips: usize,
    /// Timeout for each model endpoint call.
    pub model_timeout: Option<Duration>,
    /// Timeout for each tool provider call.
    pub tool_timeout: Option<Duration>,
    /// `max_output_tokens` sent with every completion request.
    pub max_output_tokens: u32,
    /// Budget the transcript is trimmed to before each model call.
    pub context_budget: ContextBudget,
    /// Bounds for rendered tool results.
    pub result_limits: ResultLimits,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_round_trips: 10,
            model_timeout: Some(Duration::from_secs(120)),
            tool_timeout: Some(Duration::from_secs(30)),
            max_output_tokens: 10_240,
            context_budget: ContextBudget::default(),
            result_limits: ResultLimits::default(),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_round_trips(mut self, max: usize) -> Self {
        self.max_round_trips = max;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    pub fn with_context_budget(mut self, budget: ContextBudget) -> Self {
        self.context_budget = budget;
        self
    }

    pub fn with_result_limits(mut self, limits: ResultLimits) -> Self {
        self.result_limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_round_trips, 10);
        assert_eq!(params.max_output_tokens, 10_240);
        assert_eq!(params.tool_timeout, Some(Duration::from_secs(30)));
        assert_eq!(params.result_limits.max_rows(), 20);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_round_trips(3)
            .with_model_timeout(None)
            .with_result_limits(ResultLimits::new(5, 1_000));

        assert_eq!(params.max_round_trips, 3);
        assert!(params.model_timeout.is_none());
        assert_eq!(params.result_limits.max_rows(), 5);
    }
}
