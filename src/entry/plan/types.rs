use std::path::PathBuf;

use crate::config::RunConfig;

pub(in crate::entry) enum RunPlan {
    /// Discover and print the planned queries without fetching data.
    Check(RunConfig),
    /// Full cycle, snapshot written to `filename`.
    Collect { config: RunConfig, filename: PathBuf },
}
