//! Sales database configuration from TOML (`[database]` section)

use serde::{Deserialize, Serialize};

/// Raw database configuration from TOML
///
/// # Example
///
/// ```toml
/// [database]
/// path = "shared/database/customer_sales.db"
/// max_rows = 20
/// max_result_bytes = 16000
/// require_limit = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatabaseConfig {
    /// Path to the SQLite file (opened read-only)
    pub path: String,
    /// Rows kept from a query result before truncation
    pub max_rows: usize,
    /// Bytes kept from a rendered tool result before truncation
    pub max_result_bytes: usize,
    /// Reject queries without a LIMIT clause
    pub require_limit: bool,
}

impl Default for FileDatabaseConfig {
    fn default() -> Self {
        Self {
            path: "shared/database/customer_sales.db".to_string(),
            max_rows: 20,
            max_result_bytes: 16_000,
            require_limit: true,
        }
    }
}
