//! Infrastructure layer for sales-agent
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the OpenAI-compatible model gateway, the SQLite
//! sales tool provider, the JSONL conversation logger, and configuration
//! file loading.

pub mod config;
pub mod logging;
pub mod openai;
pub mod prompt;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileConfig, FileDatabaseConfig,
    FileLoggingConfig, FileModelConfig, FileReplConfig, ModelProvider,
};
pub use logging::JsonlConversationLogger;
pub use openai::{error::OpenAiError, gateway::OpenAiGateway};
pub use prompt::SystemPromptLoader;
pub use tools::{JsonSchemaToolConverter, SqliteSalesProvider, StatementGuard, sales_tool_spec};
