//! Agent configuration from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};

/// Raw turn loop configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_round_trips = 10
/// tool_timeout_seconds = 30
/// system_prompt_file = "system_msg.txt"
/// context_budget_tokens = 100000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Maximum tool round trips per turn
    pub max_round_trips: usize,
    /// Timeout in seconds for each tool call
    pub tool_timeout_seconds: u64,
    /// File with the pinned system instructions
    pub system_prompt_file: String,
    /// Estimated token budget for the transcript
    pub context_budget_tokens: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_round_trips: 10,
            tool_timeout_seconds: 30,
            system_prompt_file: "system_msg.txt".to_string(),
            context_budget_tokens: 100_000,
        }
    }
}
