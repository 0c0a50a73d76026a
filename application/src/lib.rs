//! Application layer for sales-agent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    tool_schema::ToolSchemaPort,
    turn_progress::{NoTurnProgress, TurnProgressNotifier},
};
pub use use_cases::chat_session::ChatSession;
pub use use_cases::dispatch_tool::ToolDispatcher;
pub use use_cases::run_turn::{RunTurnError, RunTurnUseCase, TurnOutput};
