//! Tool domain module
//!
//! This module defines how the model's **function calls** are described,
//! validated and answered.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌───────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolArguments │───▶│ ToolResult   │
//! │ (registry)   │    │ (request)    │    │ (typed)       │    │ (to model)   │
//! └──────────────┘    └──────────────┘    └───────────────┘    └──────────────┘
//! ```
//!
//! - [`ToolSpec`]: registry of advertised tools, in registration order
//! - [`ToolDefinition`]: schema for a single tool (name, category, params)
//! - [`ToolCall`]: a request from the model, correlated by `id`
//! - [`ToolValidator`]: generic validation against the declared parameters
//! - [`ToolArguments`]: typed arguments per [`ToolCategory`](entities::ToolCategory)
//! - [`ToolProvider`]: the external executor (SQLite, ...)
//! - [`ToolOutput`] / [`ResultLimits`]: payload and its bounded rendering
//! - [`ToolResult`]: success or error, always fed back to the model

pub mod arguments;
pub mod entities;
pub mod output;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use arguments::ToolArguments;
pub use entities::{ToolCall, ToolDefinition, ToolSpec};
pub use output::{ResultLimits, ToolOutput};
pub use provider::{ProviderError, ToolProvider};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult};
