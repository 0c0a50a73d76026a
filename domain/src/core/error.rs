//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Invalid turn transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}

impl DomainError {
    /// Check if this error is a conversation protocol violation
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidMessage(_) | DomainError::InvalidTransition { .. }
        )
    }
}
