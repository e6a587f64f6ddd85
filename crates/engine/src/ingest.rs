use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use duckdb::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::identifiers::{quote_identifier, validate_column_names, validate_table_name};
use crate::schema::text_column_defs;
use crate::EngineResult;

/// A CSV file held fully in memory. Empty cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub table: String,
    pub row_count: usize,
}

/// Reads the whole file.
pub fn read_csv_file(csv_path: impl AsRef<Path>) -> EngineResult<CsvTable> {
    read_csv_rows(csv_path.as_ref(), None)
}

/// Reads the header and at most `limit` data records when a limit is given.
pub(crate) fn read_csv_rows(csv_path: &Path, limit: Option<usize>) -> EngineResult<CsvTable> {
    let mut reader = open_reader(csv_path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err("file has no header row".into());
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while limit.map_or(true, |limit| rows.len() < limit) && reader.read_record(&mut record)? {
        rows.push(record_to_row(&record, columns.len())?);
    }

    Ok(CsvTable { columns, rows })
}

fn open_reader(csv_path: &Path) -> EngineResult<Reader<File>> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(csv_path)?;
    Ok(reader)
}

fn record_to_row(record: &StringRecord, width: usize) -> EngineResult<Vec<Option<String>>> {
    if record.len() > width {
        let line = record.position().map_or(0, |pos| pos.line());
        return Err(format!(
            "line {line}: expected at most {width} fields, found {}",
            record.len()
        )
        .into());
    }

    let mut row: Vec<Option<String>> = record
        .iter()
        .map(|field| (!field.is_empty()).then(|| field.to_string()))
        .collect();
    row.resize(width, None);
    Ok(row)
}

/// Loads every row of `csv_path` into `table_name`, replacing the table if it
/// already exists. Every column is created as `TEXT`.
pub fn load_csv_to_table(
    conn: &Connection,
    csv_path: impl AsRef<Path>,
    table_name: &str,
) -> EngineResult<LoadReport> {
    let csv_path = csv_path.as_ref();
    validate_table_name(table_name)?;

    let table = read_csv_file(csv_path)
        .map_err(|err| format!("failed to read {}: {err}", csv_path.display()))?;
    validate_column_names(table.columns.as_slice())?;

    replace_table(conn, table_name, &table.columns)?;
    append_rows(conn, table_name, &table.rows)
        .map_err(|err| format!("failed to write rows into {table_name}: {err}"))?;

    info!(
        table = table_name,
        rows = table.rows.len(),
        path = %csv_path.display(),
        "loaded csv into table"
    );
    Ok(LoadReport {
        table: table_name.to_string(),
        row_count: table.rows.len(),
    })
}

fn replace_table(conn: &Connection, table_name: &str, columns: &[String]) -> EngineResult<()> {
    let sql = format!(
        "CREATE OR REPLACE TABLE {table} ({columns})",
        table = quote_identifier(table_name),
        columns = text_column_defs(columns)
    );
    debug!(%sql, "replacing table");
    conn.execute_batch(&sql)?;
    Ok(())
}

fn append_rows(
    conn: &Connection,
    table_name: &str,
    rows: &[Vec<Option<String>>],
) -> EngineResult<()> {
    let mut appender = conn.appender(table_name)?;
    for row in rows {
        let params: Vec<&dyn duckdb::ToSql> =
            row.iter().map(|value| value as &dyn duckdb::ToSql).collect();
        appender.append_row(params.as_slice())?;
    }
    appender.flush()?;
    Ok(())
}
