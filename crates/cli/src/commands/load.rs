use std::path::Path;
use std::process::ExitCode;

use ecomload_engine::{load_csv_to_table, DbManager};

use crate::report::format_load;
use crate::CliResult;

pub fn run(db_path: &Path, csv_path: &Path, table_name: &str) -> CliResult<ExitCode> {
    let db = DbManager::open_file(db_path)?;
    let report = load_csv_to_table(db.connection(), csv_path, table_name)?;
    db.close()?;
    print!("{}", format_load(&report));
    Ok(ExitCode::SUCCESS)
}
