use std::path::Path;
use std::process::ExitCode;

use ecomload_engine::{table_schema, DbManager};

use crate::commands::verify::ensure_exists;
use crate::CliResult;

pub fn run(db_path: &Path, table_name: &str) -> CliResult<ExitCode> {
    ensure_exists(db_path)?;
    let db = DbManager::open_file(db_path)?;
    let schema = table_schema(db.connection(), table_name)?;
    db.close()?;
    println!("{}", serde_json::to_string(&schema)?);
    Ok(ExitCode::SUCCESS)
}
