//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain [`ToolSpec`]) from "how to serialize
//! them for the API" (infrastructure).

use sales_agent_domain::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to the model API's JSON Schema format.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to JSON Schema.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert a list of tools, keeping their order.
    fn tools_schema(&self, tools: &[ToolDefinition]) -> Vec<serde_json::Value> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }

    /// Convert every tool in a registry, in registration order.
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        self.tools_schema(spec.list())
    }
}
