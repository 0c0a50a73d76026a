//! Sales database tools
//!
//! Serves the two tools the agent works with over a read-only SQLite file:
//! - `get_database_schema`: AI-readable Markdown description of the tables
//! - `fetch_sales_data_using_query`: run a guarded read-only SELECT

pub mod catalog;
pub mod describe;
pub mod guard;
pub mod provider;
mod rows;

pub use catalog::{FETCH_SALES_DATA, GET_DATABASE_SCHEMA, sales_tool_spec};
pub use guard::StatementGuard;
pub use provider::SqliteSalesProvider;
