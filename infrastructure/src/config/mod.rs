//! Configuration file loading for sales-agent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SALES_AGENT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./sales-agent.toml` or `./.sales-agent.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/sales-agent/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileConfig, FileDatabaseConfig, FileLoggingConfig,
    FileModelConfig, FileReplConfig, ModelProvider,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
