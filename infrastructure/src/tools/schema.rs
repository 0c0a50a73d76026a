//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the `function`
//! tool format of OpenAI-compatible chat completion endpoints.

use sales_agent_application::ToolSchemaPort;
use sales_agent_domain::{ParamType, ToolDefinition};

/// Converts domain tool definitions to `{"type": "function", ...}` entries.
///
/// Parameter types map one-to-one onto JSON Schema primitive types.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type {
                ParamType::String => "string",
                ParamType::Integer => "integer",
                ParamType::Number => "number",
                ParamType::Boolean => "boolean",
            };

            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}
