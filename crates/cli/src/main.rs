use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use ecomload_engine::{
    DEFAULT_DB_PATH, DEFAULT_ORDERS_CSV, DEFAULT_PREVIEW_ROWS, DEFAULT_SAMPLE_ROWS,
    DEFAULT_USERS_CSV,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

const EXIT_STATUS_HELP: &str = "\
Exit status:
  0  both files loaded and verified
  1  a CSV file could not be read (nothing written to the database), or a later stage failed";

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Parser)]
#[command(name = "ecomload")]
#[command(about = "Load users.csv and orders.csv into a local DuckDB file", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = EXIT_STATUS_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect both CSV files, load them and verify the result (default)
    #[command(after_help = EXIT_STATUS_HELP)]
    Run(RunArgs),

    /// Preview a CSV file and guess its column types
    Inspect {
        csv_path: PathBuf,

        /// Number of data rows to preview
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,

        /// Print the inspection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace a table with the full contents of a CSV file
    Load {
        db_path: PathBuf,
        csv_path: PathBuf,
        table_name: String,
    },

    /// Print the row count and a few rows of a table
    Verify {
        db_path: PathBuf,
        table_name: String,

        /// Number of sample rows to print
        #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
        limit: usize,
    },

    /// Print the columns of a table as JSON
    Schema { db_path: PathBuf, table_name: String },
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Users CSV file
    #[arg(long, env = "ECOMLOAD_USERS_CSV", default_value = DEFAULT_USERS_CSV)]
    users: PathBuf,

    /// Orders CSV file
    #[arg(long, env = "ECOMLOAD_ORDERS_CSV", default_value = DEFAULT_ORDERS_CSV)]
    orders: PathBuf,

    /// Database file to create or update
    #[arg(long, env = "ECOMLOAD_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Rows previewed per CSV file during inspection
    #[arg(long, env = "ECOMLOAD_PREVIEW_ROWS", default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Rows printed per table during verification
    #[arg(long, env = "ECOMLOAD_SAMPLE_ROWS", default_value_t = DEFAULT_SAMPLE_ROWS)]
    sample_rows: usize,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command.unwrap_or(Command::Run(cli.run)) {
        Command::Run(args) => commands::run::run(&args.into()),
        Command::Inspect {
            csv_path,
            rows,
            json,
        } => commands::inspect::run(&csv_path, rows, json),
        Command::Load {
            db_path,
            csv_path,
            table_name,
        } => commands::load::run(&db_path, &csv_path, &table_name),
        Command::Verify {
            db_path,
            table_name,
            limit,
        } => commands::verify::run(&db_path, &table_name, limit),
        Command::Schema {
            db_path,
            table_name,
        } => commands::schema::run(&db_path, &table_name),
    }
}

impl From<RunArgs> for ecomload_engine::PipelineConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            users_csv: args.users,
            orders_csv: args.orders,
            db_path: args.db,
            preview_rows: args.preview_rows,
            sample_rows: args.sample_rows,
        }
    }
}
