//! Session domain: messages exchanged with the model endpoint.

pub mod entities;
pub mod response;

pub use entities::{Message, Role};
pub use response::{ContentBlock, LlmResponse, StopReason, TokenUsage};
