//! Console rendering of pipeline progress. Everything here goes to stdout;
//! diagnostics go through `tracing` to stderr.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ecomload_engine::{CsvInspection, LoadReport, PipelineObserver, TableVerification};

const NULL_CELL: &str = "NULL";

pub const ABORT_GUIDANCE: &str = "\
ERROR: Could not read CSV files. Please check:
- File paths are correct
- Files are not open in other programs
- Files are proper CSVs (open in a text editor to check)";

pub const SUCCESS_MESSAGE: &str = "Process completed successfully!";

/// Writes each stage result as the pipeline reports it. Write errors on the
/// sink are ignored, as `print!` would otherwise panic on a closed stdout.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl ConsoleReport<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PipelineObserver for ConsoleReport<W> {
    fn inspected(&mut self, inspection: &CsvInspection) {
        let _ = write!(self.out, "{}", format_inspection(inspection));
    }

    fn inspection_failed(&mut self, path: &Path, error: &(dyn std::error::Error + Send + Sync)) {
        let _ = writeln!(self.out, "Error reading {}: {error}", path.display());
    }

    fn aborted(&mut self, _failed: &[PathBuf]) {
        let _ = writeln!(self.out, "\n{ABORT_GUIDANCE}");
        let _ = self.out.flush();
    }

    fn loaded(&mut self, report: &LoadReport) {
        let _ = write!(self.out, "{}", format_load(report));
    }

    fn verified(&mut self, verification: &TableVerification) {
        let _ = write!(self.out, "{}", format_verification(verification));
    }

    fn completed(&mut self) {
        let _ = writeln!(self.out, "\n{SUCCESS_MESSAGE}");
        let _ = self.out.flush();
    }
}

pub fn format_inspection(inspection: &CsvInspection) -> String {
    let mut out = String::new();
    let names = inspection.column_names();
    let _ = writeln!(out, "\nStructure of {}:", inspection.path.display());
    out.push_str(&format_grid(&names, &inspection.preview));
    let quoted: Vec<String> = names.iter().map(|name| quote_cell(name)).collect();
    let _ = writeln!(out, "\nColumn names: [{}]", quoted.join(", "));
    let _ = writeln!(out, "Data types:");
    let width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);
    for column in &inspection.columns {
        let _ = writeln!(out, "  {:<width$}  {}", column.name, column.inferred_type);
    }
    out
}

pub fn format_load(report: &LoadReport) -> String {
    format!("\nLoaded {} records into {}\n", report.row_count, report.table)
}

pub fn format_verification(verification: &TableVerification) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{} contains {} records",
        verification.table, verification.row_count
    );
    let _ = writeln!(
        out,
        "\nFirst {} records in {}:",
        verification.sample_rows.len(),
        verification.table
    );
    for row in &verification.sample_rows {
        let _ = writeln!(out, "{}", format_tuple(row));
    }
    out
}

/// `('1', 'Ann', None)`
pub fn format_tuple(row: &[Option<String>]) -> String {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| match cell {
            Some(value) => quote_cell(value),
            None => "None".to_string(),
        })
        .collect();
    format!("({})", cells.join(", "))
}

fn quote_cell(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Left-aligned grid with a leading row index column.
fn format_grid(columns: &[String], rows: &[Vec<Option<String>>]) -> String {
    let index_width = rows.len().saturating_sub(1).to_string().len();
    let mut widths: Vec<usize> = columns.iter().map(|name| name.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            let len = cell.as_deref().unwrap_or(NULL_CELL).chars().count();
            *width = (*width).max(len);
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (name, width) in columns.iter().zip(widths.iter().copied()) {
        let _ = write!(out, "  {name:<width$}");
    }
    out.push('\n');

    for (index, row) in rows.iter().enumerate() {
        let _ = write!(out, "{index:<index_width$}");
        for (cell, width) in row.iter().zip(widths.iter().copied()) {
            let _ = write!(out, "  {:<width$}", cell.as_deref().unwrap_or(NULL_CELL));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        format_inspection, format_load, format_tuple, format_verification, ConsoleReport,
        ABORT_GUIDANCE, SUCCESS_MESSAGE,
    };
    use ecomload_engine::{
        run_pipeline, ColumnProfile, CsvInspection, InferredType, LoadReport, PipelineConfig,
        TableVerification,
    };
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(label: &str, extension: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("ecomload_report_{label}_{suffix}.{extension}"))
    }

    fn cleanup(paths: &[&PathBuf]) {
        for path in paths {
            let _ = fs::remove_file(path);
            let _ = fs::remove_file(format!("{}.wal", path.display()));
        }
    }

    fn run_to_text(config: &PipelineConfig) -> String {
        let mut report = ConsoleReport::new(Vec::new());
        run_pipeline(config, &mut report).expect("run pipeline");
        String::from_utf8(report.into_inner()).expect("utf8 output")
    }

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn load_line_matches_console_wording() {
        let report = LoadReport {
            table: "users".to_string(),
            row_count: 10,
        };
        assert_eq!(format_load(&report), "\nLoaded 10 records into users\n");
    }

    #[test]
    fn verification_prints_count_and_sample_tuples() {
        let verification = TableVerification {
            table: "users".to_string(),
            row_count: 10,
            columns: vec!["id".into(), "name".into(), "email".into()],
            sample_rows: vec![
                vec![cell("1"), cell("Ann"), None],
                vec![cell("2"), cell("O'Neil"), cell("o@example.com")],
                vec![cell("3"), cell("Cy"), cell("c@example.com")],
            ],
        };
        let text = format_verification(&verification);
        assert!(text.contains("users contains 10 records"));
        assert!(text.contains("First 3 records in users:"));
        assert!(text.contains("('1', 'Ann', None)"));
        assert!(text.contains("('2', 'O\\'Neil', 'o@example.com')"));
    }

    #[test]
    fn tuple_of_empty_row_is_empty_parens() {
        assert_eq!(format_tuple(&[]), "()");
    }

    #[test]
    fn inspection_lists_columns_types_and_preview() {
        let inspection = CsvInspection {
            path: PathBuf::from("users.csv"),
            columns: vec![
                ColumnProfile {
                    name: "id".into(),
                    inferred_type: InferredType::Integer,
                },
                ColumnProfile {
                    name: "email".into(),
                    inferred_type: InferredType::Text,
                },
            ],
            preview: vec![vec![cell("1"), None], vec![cell("2"), cell("b@example.com")]],
        };
        let text = format_inspection(&inspection);
        assert!(text.contains("Structure of users.csv:"));
        assert!(text.contains("Column names: ['id', 'email']"));
        assert!(text.contains("id     integer"));
        assert!(text.contains("email  text"));
        assert!(text.contains("0  1   NULL"));
        assert!(text.contains("1  2   b@example.com"));
    }

    #[test]
    fn missing_orders_prints_path_then_guidance() {
        let users = temp_path("abort_users", "csv");
        fs::write(&users, "id,name,email\n1,Ann,a@example.com\n").expect("write users");
        let config = PipelineConfig {
            users_csv: users.clone(),
            orders_csv: temp_path("abort_orders_missing", "csv"),
            db_path: temp_path("abort", "db"),
            ..PipelineConfig::default()
        };

        let text = run_to_text(&config);

        let error_line = format!("Error reading {}: ", config.orders_csv.display());
        let error_at = text.find(&error_line).expect("error line names the path");
        let guidance_at = text.find(ABORT_GUIDANCE).expect("guidance printed");
        assert!(error_at < guidance_at);
        assert!(!text.contains(SUCCESS_MESSAGE));
        assert!(!config.db_path.exists());
        cleanup(&[&users]);
    }

    #[test]
    fn successful_run_prints_counts_and_success_message() {
        let users = temp_path("ok_users", "csv");
        let orders = temp_path("ok_orders", "csv");
        let mut users_text = String::from("id,name,email\n");
        for id in 1..=10 {
            users_text.push_str(&format!("{id},User {id},user{id}@example.com\n"));
        }
        fs::write(&users, users_text).expect("write users");
        fs::write(&orders, "order_id,user_id\n100,1\n").expect("write orders");
        let config = PipelineConfig {
            users_csv: users.clone(),
            orders_csv: orders.clone(),
            db_path: temp_path("ok", "db"),
            ..PipelineConfig::default()
        };

        let text = run_to_text(&config);

        assert!(text.contains("Column names: ['id', 'name', 'email']"));
        assert!(text.contains("Loaded 10 records into users"));
        assert!(text.contains("users contains 10 records"));
        assert!(text.contains("First 3 records in users:"));
        assert!(text.contains("orders contains 1 records"));
        assert!(text.trim_end().ends_with(SUCCESS_MESSAGE));
        assert!(!text.contains(ABORT_GUIDANCE));
        cleanup(&[&users, &orders, &config.db_path]);
    }
}
