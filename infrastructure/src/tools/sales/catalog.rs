//! Tool definitions for the sales database

use sales_agent_domain::{DomainError, ToolCategory, ToolDefinition, ToolParameter, ToolSpec};

/// Tool name constants
pub const GET_DATABASE_SCHEMA: &str = "get_database_schema";
pub const FETCH_SALES_DATA: &str = "fetch_sales_data_using_query";

/// Get the tool definition for get_database_schema
pub fn get_database_schema_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_DATABASE_SCHEMA,
        "Get the schema of the customer sales database: tables, column types, \
         relationships, valid values (regions, product types, categories, years) and \
         query hints. Call this first, before writing any query.",
        ToolCategory::SchemaLookup,
    )
    .with_parameter(ToolParameter::new(
        "table",
        "Limit the description to one table (customers, products or orders). \
         Omit to describe every table.",
        false,
    ))
}

/// Get the tool definition for fetch_sales_data_using_query
pub fn fetch_sales_data_definition() -> ToolDefinition {
    ToolDefinition::new(
        FETCH_SALES_DATA,
        "Execute a read-only SQLite query against the customer sales database and \
         return the rows as JSON {columns, data}. Use only table and column names from \
         the schema, prefer aggregation (SUM, AVG, COUNT, GROUP BY) unless details are \
         requested, join on the foreign keys shown in the schema, and always include \
         LIMIT 20.",
        ToolCategory::DataQuery,
    )
    .with_parameter(ToolParameter::new(
        "query",
        "A well-formed SQLite SELECT statement that includes a LIMIT clause",
        true,
    ))
}

/// Registry with both sales tools, schema lookup first
pub fn sales_tool_spec() -> Result<ToolSpec, DomainError> {
    ToolSpec::new()
        .with_tool(get_database_schema_definition())?
        .with_tool(fetch_sales_data_definition())
}
