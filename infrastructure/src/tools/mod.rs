//! Tool implementations for the sales agent
//!
//! ## Providers
//!
//! - `sales`: SQLite sales database (schema lookup and read-only queries)
//!
//! [`JsonSchemaToolConverter`] turns the registry into the `tools` payload
//! of the chat completions request.

pub mod sales;
pub mod schema;

pub use sales::{SqliteSalesProvider, StatementGuard, sales_tool_spec};
pub use schema::JsonSchemaToolConverter;
