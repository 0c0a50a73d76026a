//! Tool domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category of a tool, selecting which typed argument structure it takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    /// Describes the data source (tables, columns, valid values)
    SchemaLookup,
    /// Runs a query against the data source and returns rows
    DataQuery,
}

impl ToolCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCategory::SchemaLookup => "schema_lookup",
            ToolCategory::DataQuery => "data_query",
        }
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON type accepted by a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    /// Whether `value` has this JSON type
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool that the model may request
///
/// Immutable once registered in a [`ToolSpec`]; used for advertisement to
/// the model and for argument validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_database_schema")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Category selecting the typed argument structure
    pub category: ToolCategory,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Expected JSON type
    pub param_type: ParamType,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: ToolCategory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }
}

/// Registry of the tools advertised to the model
///
/// Keeps registration order, which is also the advertisement order.
/// There is no removal; the registry is fixed once the session starts.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
    /// Tool name -> position in `tools`
    index: HashMap<String, usize>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, failing if the name is already taken
    pub fn register(&mut self, tool: ToolDefinition) -> Result<(), DomainError> {
        if self.index.contains_key(&tool.name) {
            return Err(DomainError::DuplicateTool(tool.name));
        }
        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Registry of the definitions a provider discovered, in order
    pub fn from_definitions(
        tools: impl IntoIterator<Item = ToolDefinition>,
    ) -> Result<Self, DomainError> {
        let mut spec = Self::new();
        for tool in tools {
            spec.register(tool)?;
        }
        Ok(spec)
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_tool(mut self, tool: ToolDefinition) -> Result<Self, DomainError> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// All definitions in registration order
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A request from the model to invoke a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Model-assigned correlation id, unique within a turn
    pub id: String,
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Raw argument text when the model sent something that is not a JSON object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub malformed_arguments: Option<String>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            malformed_arguments: None,
        }
    }

    /// Build a call from the raw JSON argument string sent by the model.
    ///
    /// An empty string means "no arguments". Anything that does not parse as a
    /// JSON object is kept verbatim in `malformed_arguments` so the validator
    /// can report it back to the model.
    pub fn from_raw_arguments(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        raw: &str,
    ) -> Self {
        let mut call = Self::new(id, tool_name);
        if raw.trim().is_empty() {
            return call;
        }
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => {
                call.arguments = map.into_iter().collect();
            }
            _ => call.malformed_arguments = Some(raw.to_string()),
        }
        call
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Arguments as the JSON text the model originally sent
    pub fn arguments_json(&self) -> String {
        if let Some(raw) = &self.malformed_arguments {
            return raw.clone();
        }
        let map: serde_json::Map<String, serde_json::Value> = self
            .arguments
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::Value::Object(map).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_tool() -> ToolDefinition {
        ToolDefinition::new(
            "get_database_schema",
            "Describe tables",
            ToolCategory::SchemaLookup,
        )
        .with_parameter(ToolParameter::new("table", "Table name", false))
    }

    fn query_tool() -> ToolDefinition {
        ToolDefinition::new(
            "fetch_sales_data_using_query",
            "Run a query",
            ToolCategory::DataQuery,
        )
        .with_parameter(ToolParameter::new("query", "SQLite query", true))
    }

    #[test]
    fn test_tool_definition() {
        let tool = query_tool();
        assert_eq!(tool.name, "fetch_sales_data_using_query");
        assert_eq!(tool.category, ToolCategory::DataQuery);
        assert_eq!(tool.parameters.len(), 1);
        assert!(tool.parameter("query").unwrap().required);
        assert!(tool.parameter("missing").is_none());
    }

    #[test]
    fn test_tool_spec_keeps_registration_order() {
        let spec = ToolSpec::new()
            .with_tool(query_tool())
            .unwrap()
            .with_tool(schema_tool())
            .unwrap();

        let names: Vec<&str> = spec.names().collect();
        assert_eq!(
            names,
            vec!["fetch_sales_data_using_query", "get_database_schema"]
        );
        assert_eq!(spec.list()[1].name, "get_database_schema");
        assert!(spec.get("get_database_schema").is_some());
        assert!(spec.get("unknown").is_none());
    }

    #[test]
    fn test_tool_spec_rejects_duplicates() {
        let mut spec = ToolSpec::new();
        spec.register(schema_tool()).unwrap();

        let err = spec.register(schema_tool()).unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateTool("get_database_schema".to_string())
        );
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_tool_spec_from_discovered_definitions() {
        let spec = ToolSpec::from_definitions(vec![schema_tool(), query_tool()]).unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.list()[0].name, "get_database_schema");

        let err = ToolSpec::from_definitions(vec![query_tool(), query_tool()]).unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateTool("fetch_sales_data_using_query".to_string())
        );
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::String.accepts(&serde_json::json!("x")));
        assert!(!ParamType::String.accepts(&serde_json::json!(1)));
        assert!(ParamType::Integer.accepts(&serde_json::json!(3)));
        assert!(!ParamType::Integer.accepts(&serde_json::json!(3.5)));
        assert!(ParamType::Number.accepts(&serde_json::json!(3.5)));
        assert!(ParamType::Boolean.accepts(&serde_json::json!(true)));
    }

    #[test]
    fn test_from_raw_arguments() {
        let call = ToolCall::from_raw_arguments(
            "call_1",
            "fetch_sales_data_using_query",
            r#"{"query": "SELECT 1 LIMIT 1"}"#,
        );
        assert_eq!(call.get_string("query"), Some("SELECT 1 LIMIT 1"));
        assert!(call.malformed_arguments.is_none());

        let empty = ToolCall::from_raw_arguments("call_2", "get_database_schema", "");
        assert!(empty.arguments.is_empty());
        assert!(empty.malformed_arguments.is_none());

        let broken = ToolCall::from_raw_arguments("call_3", "x", "{\"query\": ");
        assert_eq!(broken.malformed_arguments.as_deref(), Some("{\"query\": "));

        let not_object = ToolCall::from_raw_arguments("call_4", "x", "[1, 2]");
        assert!(not_object.malformed_arguments.is_some());
    }

    #[test]
    fn test_arguments_json() {
        let call = ToolCall::new("call_1", "q").with_arg("query", "SELECT 1");
        let parsed: serde_json::Value = serde_json::from_str(&call.arguments_json()).unwrap();
        assert_eq!(parsed["query"], "SELECT 1");

        let broken = ToolCall::from_raw_arguments("call_2", "q", "not json");
        assert_eq!(broken.arguments_json(), "not json");
    }
}
