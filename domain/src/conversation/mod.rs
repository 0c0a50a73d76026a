//! Conversation state: the transcript sent to the model endpoint.
//!
//! [`Conversation`] is created once per session and owned by the turn loop,
//! which is its only writer. It enforces request/result correlation and
//! applies the [`ContextBudget`] trimming policy.

pub mod budget;
pub mod state;

pub use budget::ContextBudget;
pub use state::{Checkpoint, Conversation};
