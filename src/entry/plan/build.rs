use clap::ArgMatches;

use crate::args::CollectArgs;
use crate::config::{apply_config, build_run_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};

use super::types::RunPlan;

pub(in crate::entry) fn build_plan(mut args: CollectArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let config = build_run_config(&args)?;
    if args.check {
        return Ok(RunPlan::Check(config));
    }

    match args.filename {
        Some(filename) => Ok(RunPlan::Collect { config, filename }),
        None => {
            tracing::error!("`--filename` is required unless `--check` is set.");
            Err(AppError::validation(ValidationError::MissingFilename))
        }
    }
}
