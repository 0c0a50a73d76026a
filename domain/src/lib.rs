//! Domain layer for sales-agent
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool registry** ([`ToolSpec`]): the fixed set of tools advertised to the model
//! - **Conversation** ([`Conversation`]): the transcript sent on every model call,
//!   with request/result correlation and context trimming
//! - **Turn** ([`TurnState`]): one user question through to one final answer,
//!   possibly spanning several tool round trips

pub mod conversation;
pub mod core;
pub mod session;
pub mod tool;
pub mod turn;

// Re-export commonly used types
pub use conversation::{Checkpoint, ContextBudget, Conversation};
pub use core::{error::DomainError, question::Question};
pub use session::{
    entities::{Message, Role},
    response::{ContentBlock, LlmResponse, StopReason, TokenUsage},
};
pub use tool::{
    arguments::{DataQueryArgs, SchemaLookupArgs, ToolArguments},
    entities::{ParamType, ToolCall, ToolCategory, ToolDefinition, ToolParameter, ToolSpec},
    output::{EMPTY_RESULT_MESSAGE, ResultLimits, TabularData, ToolOutput},
    provider::{ProviderError, ToolProvider},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult, ToolStatus},
};
pub use turn::{TurnPhase, TurnState};
