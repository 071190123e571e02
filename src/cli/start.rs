use super::{commands, dispatch};
use crate::telemetry;
use anyhow::Result;
use std::process::ExitCode;

/// Main orchestrator - Pure orchestration with no business logic
///
/// Five-step data flow:
/// 1. Parse: Load `.env` and extract CLI arguments
/// 2. Extract Verbosity: Convert flag count to logging level
/// 3. Initialize Telemetry: Set up structured logging on stderr
/// 4. Dispatch: Convert `ArgMatches` into typed Action enum
/// 5. Execute: Run the pipeline and map its outcome to an exit code
///
/// # Errors
///
/// Returns an error if any setup step fails; check failures are not errors
/// here, they are reported and turned into a non-zero exit code
pub async fn start() -> Result<ExitCode> {
    // 1. Parse: a missing .env file is fine
    let _ = dotenvy::dotenv();
    let matches = commands::new().get_matches();

    // 2. Extract Verbosity
    let verbosity = matches.get_count("verbose");

    // 3. Initialize Telemetry
    telemetry::init(verbosity)?;

    // 4. Dispatch: Convert ArgMatches into typed Action enum
    let action = dispatch::dispatch(&matches)?;

    // 5. Execute: Run the action's business logic
    let outcome = action.execute().await?;

    Ok(outcome.to_exit_code())
}
