use std::path::Path;
use std::process::ExitCode;

use ecomload_engine::{verify_table, DbManager};

use crate::report::format_verification;
use crate::CliResult;

pub fn run(db_path: &Path, table_name: &str, limit: usize) -> CliResult<ExitCode> {
    ensure_exists(db_path)?;
    let db = DbManager::open_file(db_path)?;
    let verification = verify_table(db.connection(), table_name, limit)?;
    db.close()?;
    print!("{}", format_verification(&verification));
    Ok(ExitCode::SUCCESS)
}

/// Read-only commands must not create an empty database as a side effect.
pub(crate) fn ensure_exists(db_path: &Path) -> CliResult<()> {
    if !db_path.exists() {
        return Err(format!("database {} does not exist", db_path.display()).into());
    }
    Ok(())
}
