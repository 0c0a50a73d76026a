//! Typed tool arguments
//!
//! After generic validation, the argument map of a [`ToolCall`] is converted
//! into the typed structure belonging to the tool's [`ToolCategory`].
//! Providers only ever see [`ToolArguments`], never the raw map.

use super::entities::{ToolCall, ToolCategory};
use super::value_objects::ToolError;
use serde::{Deserialize, Serialize};

/// Arguments for a [`ToolCategory::SchemaLookup`] tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaLookupArgs {
    /// Restrict the description to one table
    #[serde(default)]
    pub table: Option<String>,
}

/// Arguments for a [`ToolCategory::DataQuery`] tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQueryArgs {
    pub query: String,
}

/// Validated, typed arguments tagged by tool category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ToolArguments {
    SchemaLookup(SchemaLookupArgs),
    DataQuery(DataQueryArgs),
}

impl ToolArguments {
    /// Convert a call's arguments into the structure for `category`
    pub fn from_call(category: ToolCategory, call: &ToolCall) -> Result<Self, ToolError> {
        let map: serde_json::Map<String, serde_json::Value> = call
            .arguments
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let value = serde_json::Value::Object(map);

        let arguments = match category {
            ToolCategory::SchemaLookup => {
                let mut args: SchemaLookupArgs = decode(&call.tool_name, value)?;
                args.table = args
                    .table
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());
                ToolArguments::SchemaLookup(args)
            }
            ToolCategory::DataQuery => {
                let args: DataQueryArgs = decode(&call.tool_name, value)?;
                if args.query.trim().is_empty() {
                    return Err(ToolError::invalid_argument(format!(
                        "Parameter 'query' for tool '{}' cannot be empty",
                        call.tool_name
                    )));
                }
                ToolArguments::DataQuery(DataQueryArgs {
                    query: args.query.trim().to_string(),
                })
            }
        };
        Ok(arguments)
    }

    pub fn category(&self) -> ToolCategory {
        match self {
            ToolArguments::SchemaLookup(_) => ToolCategory::SchemaLookup,
            ToolArguments::DataQuery(_) => ToolCategory::DataQuery,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    tool_name: &str,
    value: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(value).map_err(|e| {
        ToolError::invalid_argument(format!("Invalid arguments for tool '{}': {}", tool_name, e))
    })
}
