//! AI-readable schema descriptions
//!
//! Each table is rendered as a Markdown block:
//!
//! ```text
//! # Table: orders
//!
//! **Purpose:** Table containing orders data
//!
//! ## Schema
//! order_id:INTEGER, customer_id:INTEGER, ...
//!
//! ## Relationships
//! - `customer_id` → `customers.customer_id` (MANY_TO_ONE)
//!
//! ## Valid Values
//! **Available Years:** 2022, 2023
//!
//! ## Query Hints
//! - Use `orders` for queries about orders
//! - Join with `customers` using `customer_id`
//! ```

use sqlx::{Row, SqlitePool};
use tracing::warn;

/// Lists longer than this are abbreviated with a total count
const MAX_LISTED_VALUES: usize = 10;

/// Tables whose rows are referenced from many rows elsewhere
const DIMENSION_TABLES: [&str; 2] = ["customers", "products"];

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    ManyToOne,
    OneToMany,
}

impl Relationship {
    /// Inferred from the referenced table
    pub fn infer(references_table: &str) -> Self {
        if DIMENSION_TABLES.contains(&references_table) {
            Relationship::ManyToOne
        } else {
            Relationship::OneToMany
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Relationship::ManyToOne => "MANY_TO_ONE",
            Relationship::OneToMany => "ONE_TO_MANY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
    pub relationship: Relationship,
}

/// Enumerated values worth showing to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ValidValues {
    pub label: &'static str,
    pub values: Vec<String>,
    /// Abbreviate long lists
    pub abbreviate: bool,
}

impl ValidValues {
    fn render(&self) -> String {
        if self.abbreviate && self.values.len() > MAX_LISTED_VALUES {
            format!(
                "**{}:** {}, ... [{} total options]",
                self.label,
                self.values[..MAX_LISTED_VALUES].join(", "),
                self.values.len()
            )
        } else {
            format!("**{}:** {}", self.label, self.values.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKey>,
    pub valid_values: Vec<ValidValues>,
}

impl TableSchema {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = vec![format!("# Table: {}", self.name), String::new()];
        lines.push(format!("**Purpose:** Table containing {} data", self.name));

        lines.push("\n## Schema".to_string());
        lines.push(
            self.columns
                .iter()
                .map(|c| format!("{}:{}", c.name, c.data_type))
                .collect::<Vec<_>>()
                .join(", "),
        );

        if !self.foreign_keys.is_empty() {
            lines.push("\n## Relationships".to_string());
            for fk in &self.foreign_keys {
                lines.push(format!(
                    "- `{}` → `{}.{}` ({})",
                    fk.column,
                    fk.references_table,
                    fk.references_column,
                    fk.relationship.as_str()
                ));
            }
        }

        let valid: Vec<String> = self
            .valid_values
            .iter()
            .filter(|v| !v.values.is_empty())
            .map(ValidValues::render)
            .collect();
        if !valid.is_empty() {
            lines.push("\n## Valid Values".to_string());
            lines.extend(valid);
        }

        lines.push("\n## Query Hints".to_string());
        lines.push(format!(
            "- Use `{}` for queries about {}",
            self.name,
            self.name.replace('_', " ")
        ));
        for fk in &self.foreign_keys {
            lines.push(format!(
                "- Join with `{}` using `{}`",
                fk.references_table, fk.column
            ));
        }

        lines.join("\n") + "\n"
    }
}

/// Rendered in place of a schema for a table that does not exist
pub fn table_not_found(table: &str) -> String {
    format!("**ERROR:** Table '{}' not found", table)
}

/// Quote an identifier for interpolation into SQL
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// User tables, sorted by name
pub async fn table_names(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Describe one table, `None` if it does not exist
pub async fn table_schema(
    pool: &SqlitePool,
    table: &str,
) -> Result<Option<TableSchema>, sqlx::Error> {
    let exists: Option<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(pool)
            .await?;
    let Some(name) = exists else {
        return Ok(None);
    };

    let columns = sqlx::query(&format!("PRAGMA table_info({})", quote_ident(&name)))
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| -> Result<ColumnInfo, sqlx::Error> {
            Ok(ColumnInfo {
                name: row.try_get("name")?,
                data_type: row.try_get("type")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut foreign_keys = sqlx::query(&format!("PRAGMA foreign_key_list({})", quote_ident(&name)))
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| -> Result<ForeignKey, sqlx::Error> {
            let references_table: String = row.try_get("table")?;
            let references_column: Option<String> = row.try_get("to")?;
            Ok(ForeignKey {
                column: row.try_get("from")?,
                relationship: Relationship::infer(&references_table),
                references_column: references_column.unwrap_or_default(),
                references_table,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    foreign_keys.sort_by(|a, b| a.column.cmp(&b.column));

    let mut schema = TableSchema {
        name,
        columns,
        foreign_keys,
        valid_values: Vec::new(),
    };
    schema.valid_values = valid_values(pool, &schema).await;
    Ok(Some(schema))
}

/// Enumerated values for the known sales tables. Lookups that fail are skipped.
async fn valid_values(pool: &SqlitePool, schema: &TableSchema) -> Vec<ValidValues> {
    let enumerated: &[(&str, &'static str)] = match schema.name.as_str() {
        "customers" => &[("region", "Valid Regions")],
        "products" => &[
            ("product_type", "Valid Product Types"),
            ("main_category", "Valid Categories"),
        ],
        _ => &[],
    };

    let mut values = Vec::new();
    for &(column, label) in enumerated {
        if !schema.has_column(column) {
            continue;
        }
        match distinct_values(pool, &schema.name, column).await {
            Ok(list) => values.push(ValidValues {
                label,
                values: list,
                abbreviate: true,
            }),
            Err(e) => warn!("Could not list values of {}.{}: {}", schema.name, column, e),
        }
    }

    if schema.name == "orders" && schema.has_column("order_date") {
        match reporting_years(pool).await {
            Ok(years) => values.push(ValidValues {
                label: "Available Years",
                values: years,
                abbreviate: false,
            }),
            Err(e) => warn!("Could not list reporting years: {}", e),
        }
    }
    values
}

async fn distinct_values(
    pool: &SqlitePool,
    table: &str,
    column: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let column = quote_ident(column);
    let values: Vec<Option<String>> = sqlx::query_scalar(&format!(
        "SELECT DISTINCT CAST({col} AS TEXT) FROM {table} WHERE {col} IS NOT NULL ORDER BY {col}",
        col = column,
        table = quote_ident(table)
    ))
    .fetch_all(pool)
    .await?;
    Ok(values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_empty())
        .collect())
}

async fn reporting_years(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let years: Vec<Option<String>> = sqlx::query_scalar(
        "SELECT DISTINCT strftime('%Y', order_date) AS year FROM orders \
         WHERE order_date IS NOT NULL ORDER BY year",
    )
    .fetch_all(pool)
    .await?;
    Ok(years.into_iter().flatten().collect())
}
