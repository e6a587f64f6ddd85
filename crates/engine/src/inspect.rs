use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::ingest::read_csv_rows;
use crate::EngineResult;

/// Number of data rows sampled when previewing a file.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Value type guessed from a sample. Only used for display; every column is
/// stored as text. Blank cells are ignored, so an integer column with gaps is
/// still `Integer`, and booleans match `true`/`false` in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredType {
    Integer,
    Float,
    Boolean,
    Text,
    Empty,
}

impl InferredType {
    fn infer<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.filter(|value| !value.is_empty()).collect();
        if values.is_empty() {
            Self::Empty
        } else if values.iter().all(|value| value.parse::<i64>().is_ok()) {
            Self::Integer
        } else if values.iter().all(|value| value.parse::<f64>().is_ok()) {
            Self::Float
        } else if values
            .iter()
            .all(|value| value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false"))
        {
            Self::Boolean
        } else {
            Self::Text
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Empty => "empty",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: InferredType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvInspection {
    pub path: PathBuf,
    pub columns: Vec<ColumnProfile>,
    pub preview: Vec<Vec<Option<String>>>,
}

impl CsvInspection {
    /// Column names in header order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }
}

/// Reads the header and the first `preview_rows` records of a CSV file.
///
/// Errors cover everything that stops the file from being read as a CSV with
/// a header row: missing file, permissions, invalid UTF-8, an empty file, or
/// a record wider than the header.
pub fn inspect_csv(csv_path: impl AsRef<Path>, preview_rows: usize) -> EngineResult<CsvInspection> {
    let csv_path = csv_path.as_ref();
    let sample = read_csv_rows(csv_path, Some(preview_rows))?;

    let columns = sample
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnProfile {
            name: name.clone(),
            inferred_type: InferredType::infer(
                sample
                    .rows
                    .iter()
                    .filter_map(|row| row.get(index).and_then(Option::as_deref)),
            ),
        })
        .collect();

    debug!(path = %csv_path.display(), rows = sample.rows.len(), "inspected csv");
    Ok(CsvInspection {
        path: csv_path.to_path_buf(),
        columns,
        preview: sample.rows,
    })
}
