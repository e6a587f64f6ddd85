use duckdb::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::identifiers::{quote_identifier, validate_column_names, validate_table_name};
use crate::pipeline::{ORDERS_TABLE, USERS_TABLE};
use crate::EngineResult;

/// A table name and the ordered column names read from a CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    pub cid: i64,
    pub name: String,
    pub data_type: String,
    pub notnull: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Creates the `users` and `orders` tables if they are absent.
pub fn build_schema(
    conn: &Connection,
    users_columns: &[String],
    orders_columns: &[String],
) -> EngineResult<()> {
    create_table_if_absent(conn, &TableDescriptor::new(USERS_TABLE, users_columns.to_vec()))?;
    create_table_if_absent(conn, &TableDescriptor::new(ORDERS_TABLE, orders_columns.to_vec()))?;
    Ok(())
}

/// One `TEXT` column per name; no keys or constraints.
pub fn create_table_if_absent(conn: &Connection, table: &TableDescriptor) -> EngineResult<()> {
    validate_table_name(&table.name)?;
    validate_column_names(table.columns.as_slice())
        .map_err(|err| format!("invalid columns for {}: {err}", table.name))?;

    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {table} ({columns})",
        table = quote_identifier(&table.name),
        columns = text_column_defs(&table.columns)
    );
    debug!(%sql, "creating table");
    conn.execute_batch(&sql)?;
    info!(table = %table.name, columns = table.columns.len(), "table ensured");
    Ok(())
}

pub(crate) fn text_column_defs(columns: &[String]) -> String {
    columns
        .iter()
        .map(|column| format!("{} TEXT", quote_identifier(column)))
        .collect::<Vec<String>>()
        .join(", ")
}

pub fn table_schema(conn: &Connection, table_name: &str) -> EngineResult<Vec<TableColumn>> {
    validate_table_name(table_name)?;
    let sql = format!("PRAGMA table_info('{table}')", table = table_name);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let notnull: bool = row.get(3)?;
        let pk: bool = row.get(5)?;
        Ok(TableColumn {
            cid: row.get(0)?,
            name: row.get(1)?,
            data_type: row.get(2)?,
            notnull,
            default_value: row.get(4)?,
            primary_key: pk,
        })
    })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    if columns.is_empty() {
        return Err(format!("table {table_name} does not exist").into());
    }
    Ok(columns)
}
