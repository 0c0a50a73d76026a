//! SQLite row to JSON conversion for arbitrary query results

use sales_agent_domain::TabularData;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Build a table from the leading rows of a result of `total` rows.
/// Column names come from the first row.
pub(crate) fn to_table(rows: &[SqliteRow], total: usize) -> Result<TabularData, sqlx::Error> {
    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let mut table = TabularData::new(columns).with_total_rows(total);
    for row in rows {
        let values = (0..row.len())
            .map(|index| cell(row, index))
            .collect::<Result<Vec<_>, _>>()?;
        table = table.with_row(values);
    }
    Ok(table)
}

/// Decode one cell by its runtime storage class.
fn cell(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" | "NUMERIC" => serde_json::Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::String(format!("<blob: {} bytes>", bytes.len()))
        }
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}
