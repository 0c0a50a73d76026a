//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section uses `#[serde(default)]`, so a partial file is valid.

mod agent;
mod database;
mod logging;
mod models;
mod repl;

pub use agent::FileAgentConfig;
pub use database::FileDatabaseConfig;
pub use logging::FileLoggingConfig;
pub use models::{FileModelConfig, ModelProvider};
pub use repl::FileReplConfig;

use sales_agent_application::ExecutionParams;
use sales_agent_domain::{ContextBudget, ResultLimits};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("agent.max_round_trips must be at least 1")]
    InvalidRoundTrips,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("model.endpoint is required for provider '{0}'")]
    MissingEndpoint(String),

    #[error("{0} must be at least 1")]
    InvalidLimit(&'static str),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model endpoint settings
    pub model: FileModelConfig,
    /// Turn loop settings
    pub agent: FileAgentConfig,
    /// Sales database settings
    pub database: FileDatabaseConfig,
    /// Log file settings
    pub logging: FileLoggingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("model.timeout_seconds"));
        }
        if self.agent.tool_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "agent.tool_timeout_seconds",
            ));
        }
        if self.agent.max_round_trips == 0 {
            return Err(ConfigValidationError::InvalidRoundTrips);
        }
        if self.model.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.model.resolved_endpoint().is_none() {
            return Err(ConfigValidationError::MissingEndpoint(
                self.model.provider.as_str().to_string(),
            ));
        }
        if self.model.max_output_tokens == 0 {
            return Err(ConfigValidationError::InvalidLimit("model.max_output_tokens"));
        }
        if self.database.max_rows == 0 {
            return Err(ConfigValidationError::InvalidLimit("database.max_rows"));
        }
        if self.database.max_result_bytes == 0 {
            return Err(ConfigValidationError::InvalidLimit("database.max_result_bytes"));
        }
        if self.agent.context_budget_tokens == 0 {
            return Err(ConfigValidationError::InvalidLimit(
                "agent.context_budget_tokens",
            ));
        }
        Ok(())
    }

    pub fn result_limits(&self) -> ResultLimits {
        ResultLimits::new(self.database.max_rows, self.database.max_result_bytes)
    }

    /// Turn loop parameters from the `[model]`, `[agent]` and `[database]` sections
    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_round_trips(self.agent.max_round_trips)
            .with_model_timeout(Some(Duration::from_secs(self.model.timeout_seconds)))
            .with_tool_timeout(Some(Duration::from_secs(self.agent.tool_timeout_seconds)))
            .with_max_output_tokens(self.model.max_output_tokens)
            .with_context_budget(ContextBudget::new(self.agent.context_budget_tokens))
            .with_result_limits(self.result_limits())
    }
}
