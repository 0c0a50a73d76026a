//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async dispatching lives in the application layer.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator: Send + Sync {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        if let Some(raw) = &call.malformed_arguments {
            return Err(ToolError::invalid_argument(format!(
                "Arguments for tool '{}' must be a JSON object, got: {}",
                definition.name,
                crate::core::string::truncate(raw, 200)
            )));
        }

        // Check that all required parameters are present
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(ToolError::invalid_argument(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                )));
            }
        }

        // Check that all provided arguments are known and well-typed.
        // Sorted so the first reported problem is deterministic.
        let mut names: Vec<&String> = call.arguments.keys().collect();
        names.sort();
        for arg_name in names {
            let Some(param) = definition.parameter(arg_name) else {
                return Err(ToolError::invalid_argument(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                )));
            };
            let value = &call.arguments[arg_name];
            if value.is_null() && !param.required {
                continue;
            }
            if !param.param_type.accepts(value) {
                return Err(ToolError::invalid_argument(format!(
                    "Parameter '{}' for tool '{}' must be of type {}",
                    arg_name, definition.name, param.param_type
                )));
            }
        }

        Ok(())
    }
}
