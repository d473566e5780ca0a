use chrono::Local;

use crate::app::{run_check, run_collect};
use crate::collect::resolve_window;
use crate::error::AppResult;
use crate::provider::CloudWatchProvider;

use super::types::RunPlan;

pub(in crate::entry) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let config = match &plan {
        RunPlan::Check(config) | RunPlan::Collect { config, .. } => config,
    };
    let window = resolve_window(config.anchor.as_deref(), config.interval()?, &Local::now())?;
    let provider = CloudWatchProvider::new(&config.provider)?;

    match plan {
        RunPlan::Check(config) => run_check(&provider, &config, window).await,
        RunPlan::Collect { config, filename } => {
            run_collect(&provider, &config, window, &filename).await
        }
    }
}
