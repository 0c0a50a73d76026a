//! SQLite sales tool provider
//!
//! Opens the sales database read-only and serves the tools listed in
//! [`sales_tool_spec`](super::sales_tool_spec). Every invocation is one
//! database operation; failures come back as [`ProviderError`] and are fed
//! to the model by the dispatcher.

use super::catalog::{FETCH_SALES_DATA, GET_DATABASE_SCHEMA, sales_tool_spec};
use super::describe::{table_names, table_not_found, table_schema};
use super::guard::StatementGuard;
use super::rows::to_table;
use async_trait::async_trait;
use futures::TryStreamExt;
use sales_agent_domain::{
    DataQueryArgs, ProviderError, ResultLimits, SchemaLookupArgs, ToolArguments, ToolDefinition,
    ToolOutput, ToolProvider,
};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MAX_CONNECTIONS: u32 = 4;

pub struct SqliteSalesProvider {
    pool: SqlitePool,
    path: PathBuf,
    guard: StatementGuard,
    row_limit: usize,
}

impl SqliteSalesProvider {
    /// Open the database file read-only.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ProviderError::NotAvailable(format!(
                "Database file not found at {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| ProviderError::ConnectionFailed(e.to_string()))?;

        info!("Opened sales database {} (read-only)", path.display());
        Ok(Self {
            pool,
            path: path.to_path_buf(),
            guard: StatementGuard::default(),
            row_limit: ResultLimits::default().max_rows(),
        })
    }

    pub fn with_guard(mut self, guard: StatementGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Rows kept per query. Further rows are counted, not decoded.
    pub fn with_row_limit(mut self, max_rows: usize) -> Self {
        self.row_limit = max_rows;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn describe(&self, args: &SchemaLookupArgs) -> Result<ToolOutput, ProviderError> {
        let tables = match &args.table {
            Some(table) => vec![table.clone()],
            None => table_names(&self.pool).await.map_err(execution_failed)?,
        };

        let mut sections = Vec::with_capacity(tables.len());
        for table in &tables {
            let section = match table_schema(&self.pool, table)
                .await
                .map_err(execution_failed)?
            {
                Some(schema) => schema.to_markdown(),
                None => table_not_found(table),
            };
            sections.push(section);
        }
        Ok(ToolOutput::Text(sections.join("\n")))
    }

    async fn query(&self, args: &DataQueryArgs) -> Result<ToolOutput, ProviderError> {
        let statement = self.guard.check(&args.query)?;
        debug!("Executing sales query: {}", statement);

        let mut stream = sqlx::query(statement).fetch(&self.pool);
        let mut rows = Vec::new();
        let mut total = 0usize;
        while let Some(row) = stream.try_next().await.map_err(execution_failed)? {
            total += 1;
            if rows.len() < self.row_limit {
                rows.push(row);
            }
        }
        drop(stream);

        let table = to_table(&rows, total).map_err(execution_failed)?;
        debug!(
            "Sales query returned {} rows, kept {}",
            total,
            table.row_count()
        );
        Ok(ToolOutput::Table(table))
    }
}

fn execution_failed(error: sqlx::Error) -> ProviderError {
    ProviderError::ExecutionFailed(error.to_string())
}

#[async_trait]
impl ToolProvider for SqliteSalesProvider {
    fn id(&self) -> &str {
        "sqlite"
    }

    fn display_name(&self) -> &str {
        "SQLite sales database"
    }

    async fn is_available(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        let spec = sales_tool_spec().map_err(|e| ProviderError::DiscoveryFailed(e.to_string()))?;
        Ok(spec.list().to_vec())
    }

    async fn execute(
        &self,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> Result<ToolOutput, ProviderError> {
        match (tool_name, arguments) {
            (GET_DATABASE_SCHEMA, ToolArguments::SchemaLookup(args)) => self.describe(args).await,
            (FETCH_SALES_DATA, ToolArguments::DataQuery(args)) => self.query(args).await,
            _ => Err(ProviderError::UnsupportedTool(format!(
                "{} ({})",
                tool_name,
                arguments.category()
            ))),
        }
    }
}
