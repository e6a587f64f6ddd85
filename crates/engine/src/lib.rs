mod db_manager;
mod identifiers;
mod inspect;
mod ingest;
mod pipeline;
mod schema;
mod verify;

#[cfg(test)]
mod test_support;

pub use db_manager::DbManager;
pub use identifiers::{quote_identifier, validate_column_names, validate_table_name};
pub use ingest::{load_csv_to_table, read_csv_file, CsvTable, LoadReport};
pub use inspect::{inspect_csv, ColumnProfile, CsvInspection, InferredType, DEFAULT_PREVIEW_ROWS};
pub use pipeline::{
    run_pipeline, PipelineConfig, PipelineObserver, PipelineOutcome, DEFAULT_DB_PATH,
    DEFAULT_ORDERS_CSV, DEFAULT_USERS_CSV, ORDERS_TABLE, USERS_TABLE,
};
pub use schema::{build_schema, create_table_if_absent, table_schema, TableColumn, TableDescriptor};
pub use verify::{verify_table, TableVerification, DEFAULT_SAMPLE_ROWS};

/// Shared result type for every pipeline stage.
pub type EngineResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
