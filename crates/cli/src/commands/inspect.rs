use std::path::Path;
use std::process::ExitCode;

use ecomload_engine::inspect_csv;

use crate::report::format_inspection;
use crate::CliResult;

pub fn run(csv_path: &Path, rows: usize, json: bool) -> CliResult<ExitCode> {
    let inspection = inspect_csv(csv_path, rows)
        .map_err(|err| format!("Error reading {}: {err}", csv_path.display()))?;
    if json {
        println!("{}", serde_json::to_string(&inspection)?);
    } else {
        print!("{}", format_inspection(&inspection));
    }
    Ok(ExitCode::SUCCESS)
}
