//! Context budget for the transcript sent to the model endpoint.
//!
//! [`ContextBudget`] bounds the estimated token size of
//! [`Conversation::snapshot`](super::Conversation::snapshot). When the
//! estimate exceeds the budget, the oldest non-system messages are dropped
//! (see [`Conversation::trim_to_budget`](super::Conversation::trim_to_budget)).

use serde::{Deserialize, Serialize};

/// Token budget for the conversation context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    max_tokens: usize,
}

impl ContextBudget {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn is_exceeded_by(&self, estimated_tokens: usize) -> bool {
        estimated_tokens > self.max_tokens
    }
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            max_tokens: 100_000,
        }
    }
}
