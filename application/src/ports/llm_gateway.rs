//! LLM Gateway port
//!
//! Defines the interface for communicating with the model endpoint.

use async_trait::async_trait;
use sales_agent_domain::{LlmResponse, Message, ToolDefinition};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout)
    }
}

/// One call to the model endpoint.
///
/// `messages` is the conversation snapshot and `tools` the registry listing,
/// both passed through verbatim.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolDefinition],
    pub max_output_tokens: u32,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the model endpoint.
/// Implementations (adapters) live in the infrastructure layer and own the
/// transport, wire format, and credentials.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model identifier used for display and logging
    fn model_name(&self) -> &str;

    /// Send the transcript and tool list; returns either text or tool calls.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, GatewayError>;
}
