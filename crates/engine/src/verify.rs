use duckdb::Connection;
use serde::Serialize;
use tracing::info;

use crate::identifiers::{quote_identifier, validate_table_name};
use crate::schema::table_schema;
use crate::EngineResult;

/// Number of rows shown per table after loading.
pub const DEFAULT_SAMPLE_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableVerification {
    pub table: String,
    pub row_count: i64,
    pub columns: Vec<String>,
    pub sample_rows: Vec<Vec<Option<String>>>,
}

/// Counts the rows of `table_name` and fetches up to `sample_limit` of them.
/// No ordering is requested, so which rows come back is up to the engine.
pub fn verify_table(
    conn: &Connection,
    table_name: &str,
    sample_limit: usize,
) -> EngineResult<TableVerification> {
    validate_table_name(table_name)?;
    let table = quote_identifier(table_name);

    let count_sql = format!("SELECT COUNT(*) FROM {table}");
    let row_count: i64 = conn.query_row(&count_sql, [], |row| row.get(0))?;

    let columns: Vec<String> = table_schema(conn, table_name)?
        .into_iter()
        .map(|column| column.name)
        .collect();

    // Cells come back as text whatever the declared column type.
    let select_list = columns
        .iter()
        .map(|column| format!("CAST({} AS VARCHAR)", quote_identifier(column)))
        .collect::<Vec<String>>()
        .join(", ");
    let sample_sql = format!("SELECT {select_list} FROM {table} LIMIT {sample_limit}");
    let mut stmt = conn.prepare(&sample_sql)?;
    let mut rows = stmt.query([])?;
    let mut sample_rows = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            cells.push(row.get::<_, Option<String>>(index)?);
        }
        sample_rows.push(cells);
    }

    info!(table = table_name, rows = row_count, "verified table");
    Ok(TableVerification {
        table: table_name.to_string(),
        row_count,
        columns,
        sample_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::verify_table;
    use duckdb::Connection;

    fn seeded_conn(rows: usize) -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory duckdb");
        conn.execute_batch("CREATE TABLE users (id TEXT, name TEXT, email TEXT)")
            .expect("create table");
        for id in 1..=rows {
            conn.execute(
                "INSERT INTO users VALUES ($1, $2, NULL)",
                duckdb::params![id.to_string(), format!("User {id}")],
            )
            .expect("insert");
        }
        conn
    }

    #[test]
    fn counts_rows_and_samples_three() {
        let conn = seeded_conn(10);
        let verification = verify_table(&conn, "users", 3).expect("verify");

        assert_eq!(verification.table, "users");
        assert_eq!(verification.row_count, 10);
        assert_eq!(verification.columns, vec!["id", "name", "email"]);
        assert_eq!(verification.sample_rows.len(), 3);
        assert!(verification.sample_rows.iter().all(|row| row.len() == 3));
        assert!(verification.sample_rows.iter().all(|row| row[2].is_none()));
    }

    #[test]
    fn sample_is_capped_by_row_count() {
        let conn = seeded_conn(2);
        let verification = verify_table(&conn, "users", 3).expect("verify");
        assert_eq!(verification.row_count, 2);
        assert_eq!(verification.sample_rows.len(), 2);
    }

    #[test]
    fn empty_table_has_no_samples() {
        let conn = seeded_conn(0);
        let verification = verify_table(&conn, "users", 3).expect("verify");
        assert_eq!(verification.row_count, 0);
        assert!(verification.sample_rows.is_empty());
    }

    #[test]
    fn does_not_modify_the_table() {
        let conn = seeded_conn(4);
        verify_table(&conn, "users", 3).expect("first verify");
        let again = verify_table(&conn, "users", 3).expect("second verify");
        assert_eq!(again.row_count, 4);
    }

    #[test]
    fn renders_non_text_columns_as_text() {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE orders (id INTEGER, total DOUBLE, shipped BOOLEAN, note VARCHAR);
             INSERT INTO orders VALUES (1, 2.5, true, NULL);",
        )
        .expect("seed typed table");

        let verification = verify_table(&conn, "orders", 3).expect("verify");
        assert_eq!(verification.row_count, 1);
        assert_eq!(
            verification.sample_rows,
            vec![vec![
                Some("1".to_string()),
                Some("2.5".to_string()),
                Some("true".to_string()),
                None,
            ]]
        );
    }

    #[test]
    fn missing_table_errors() {
        let conn = Connection::open_in_memory().expect("open");
        assert!(verify_table(&conn, "orders", 3).is_err());
    }
}
