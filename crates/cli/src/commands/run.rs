use std::process::ExitCode;

use ecomload_engine::{run_pipeline, PipelineConfig, PipelineOutcome};
use tracing::info;

use crate::report::ConsoleReport;
use crate::CliResult;

pub fn run(config: &PipelineConfig) -> CliResult<ExitCode> {
    info!(?config, "starting pipeline");
    let mut report = ConsoleReport::stdout();
    match run_pipeline(config, &mut report)? {
        PipelineOutcome::Completed { .. } => Ok(ExitCode::SUCCESS),
        PipelineOutcome::Aborted { .. } => Ok(ExitCode::FAILURE),
    }
}
