//! Tool provider abstraction
//!
//! A [`ToolProvider`] is the external collaborator that actually executes a
//! named capability, e.g. running a query against the sales database.
//!
//! ```text
//! ┌──────────────┐   validated    ┌──────────────┐   ToolOutput   ┌──────────────┐
//! │  Dispatcher  │───────────────▶│ ToolProvider │───────────────▶│  Dispatcher  │
//! │ (application)│ ToolArguments  │  (infra)     │ ProviderError  │ → ToolResult │
//! └──────────────┘                └──────────────┘                └──────────────┘
//! ```
//!
//! Providers never see raw model arguments; the dispatcher validates them
//! and converts them to [`ToolArguments`] first. Provider errors are turned
//! into `error` tool results, so a failing query never ends the conversation.

use async_trait::async_trait;
use thiserror::Error;

use super::arguments::ToolArguments;
use super::entities::ToolDefinition;
use super::output::ToolOutput;

/// Error type for tool provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider is not available (e.g., database file missing)
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// Failed to discover tools from the provider
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Tool not served by this provider
    #[error("Tool not supported: {0}")]
    UnsupportedTool(String),

    /// The request was refused before execution (e.g. statement guard)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Tool execution failed (syntax error, unknown column, I/O)
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Connection to the underlying data source failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Tool provider abstraction - external source of tools
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier for this provider (e.g. "sqlite")
    fn id(&self) -> &str;

    /// Display name for user-facing output
    fn display_name(&self) -> &str;

    /// Check if the provider is available and properly configured
    async fn is_available(&self) -> bool;

    /// Tool definitions this provider serves
    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError>;

    /// Execute one tool call with already validated arguments.
    ///
    /// Exactly one external operation per invocation.
    async fn execute(
        &self,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> Result<ToolOutput, ProviderError>;
}
