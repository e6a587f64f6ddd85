use std::collections::HashSet;

use crate::EngineResult;

pub fn validate_table_name(table_name: &str) -> EngineResult<()> {
    let mut chars = table_name.chars();
    let Some(first) = chars.next() else {
        return Err("table name is empty".into());
    };
    if !is_ident_start(first) || !chars.all(is_ident_continue) {
        return Err(format!(
            "table name {table_name:?} must be alphanumeric or underscore and start with a letter or underscore"
        )
        .into());
    }
    Ok(())
}

/// Column names come straight from CSV headers, so they are quoted rather
/// than allow-listed. Reserved words and spaces are kept as written.
pub fn validate_column_names<S: AsRef<str>>(columns: &[S]) -> EngineResult<()> {
    if columns.is_empty() {
        return Err("at least one column is required".into());
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let column = column.as_ref();
        if column.is_empty() {
            return Err(format!("column {} has an empty name", index + 1).into());
        }
        if column.chars().any(char::is_control) {
            return Err(format!("column name {column:?} contains a control character").into());
        }
        // DuckDB resolves identifiers case-insensitively.
        if !seen.insert(column.to_lowercase()) {
            return Err(format!("duplicate column name {column:?}").into());
        }
    }
    Ok(())
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn is_ident_start(value: char) -> bool {
    value == '_' || value.is_ascii_alphabetic()
}

fn is_ident_continue(value: char) -> bool {
    is_ident_start(value) || value.is_ascii_digit()
}
