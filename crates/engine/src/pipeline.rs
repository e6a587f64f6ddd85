//! Top-level flow: inspect both sources, then load and verify them through a
//! single database connection. Inspection failures end the run before the
//! database is touched; every later failure is returned to the caller.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::db_manager::DbManager;
use crate::ingest::{load_csv_to_table, LoadReport};
use crate::inspect::{inspect_csv, CsvInspection, DEFAULT_PREVIEW_ROWS};
use crate::schema::build_schema;
use crate::verify::{verify_table, TableVerification, DEFAULT_SAMPLE_ROWS};
use crate::EngineResult;

pub const USERS_TABLE: &str = "users";
pub const ORDERS_TABLE: &str = "orders";
pub const DEFAULT_USERS_CSV: &str = "users.csv";
pub const DEFAULT_ORDERS_CSV: &str = "orders.csv";
pub const DEFAULT_DB_PATH: &str = "ecommerce.db";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub users_csv: PathBuf,
    pub orders_csv: PathBuf,
    pub db_path: PathBuf,
    pub preview_rows: usize,
    pub sample_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            users_csv: PathBuf::from(DEFAULT_USERS_CSV),
            orders_csv: PathBuf::from(DEFAULT_ORDERS_CSV),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// At least one source could not be inspected. The database was not opened.
    Aborted { failed: Vec<PathBuf> },
    Completed {
        loads: Vec<LoadReport>,
        verifications: Vec<TableVerification>,
    },
}

/// Receives stage results as they happen so a front end can report progress
/// even when a later stage fails.
pub trait PipelineObserver {
    fn inspected(&mut self, _inspection: &CsvInspection) {}

    fn inspection_failed(&mut self, _path: &Path, _error: &(dyn std::error::Error + Send + Sync)) {}

    fn aborted(&mut self, _failed: &[PathBuf]) {}

    fn loaded(&mut self, _report: &LoadReport) {}

    fn verified(&mut self, _verification: &TableVerification) {}

    fn completed(&mut self) {}
}

impl PipelineObserver for () {}

pub fn run_pipeline(
    config: &PipelineConfig,
    observer: &mut impl PipelineObserver,
) -> EngineResult<PipelineOutcome> {
    let users = inspect_source(&config.users_csv, config.preview_rows, observer);
    let orders = inspect_source(&config.orders_csv, config.preview_rows, observer);

    let (users_columns, orders_columns) = match (users, orders) {
        (Some(users), Some(orders)) => (users, orders),
        (users, orders) => {
            let failed: Vec<PathBuf> = [
                (users.is_none(), &config.users_csv),
                (orders.is_none(), &config.orders_csv),
            ]
            .into_iter()
            .filter(|(missing, _)| *missing)
            .map(|(_, path)| path.clone())
            .collect();
            warn!(?failed, "aborting before opening the database");
            observer.aborted(&failed);
            return Ok(PipelineOutcome::Aborted { failed });
        }
    };

    let db = DbManager::open_file(&config.db_path)?;
    let conn = db.connection();
    build_schema(conn, &users_columns, &orders_columns)?;

    let mut loads = Vec::with_capacity(2);
    for (csv_path, table) in [
        (&config.users_csv, USERS_TABLE),
        (&config.orders_csv, ORDERS_TABLE),
    ] {
        let report = load_csv_to_table(conn, csv_path, table)?;
        observer.loaded(&report);
        loads.push(report);
    }

    let mut verifications = Vec::with_capacity(2);
    for table in [USERS_TABLE, ORDERS_TABLE] {
        let verification = verify_table(conn, table, config.sample_rows)?;
        observer.verified(&verification);
        verifications.push(verification);
    }

    db.close()?;
    info!(db = %config.db_path.display(), "pipeline completed");
    observer.completed();

    Ok(PipelineOutcome::Completed {
        loads,
        verifications,
    })
}

fn inspect_source(
    path: &Path,
    preview_rows: usize,
    observer: &mut impl PipelineObserver,
) -> Option<Vec<String>> {
    match inspect_csv(path, preview_rows) {
        Ok(inspection) => {
            observer.inspected(&inspection);
            Some(inspection.column_names())
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to inspect csv");
            observer.inspection_failed(path, &*err);
            None
        }
    }
}
