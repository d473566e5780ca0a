use std::path::Path;

use crate::collect;
use crate::config::RunConfig;
use crate::domain::TimeWindow;
use crate::error::AppResult;
use crate::provider::MetricsProvider;
use crate::sinks::write_snapshot;

/// Runs the full cycle and writes the snapshot once everything correlated.
pub(crate) async fn run_collect(
    provider: &dyn MetricsProvider,
    config: &RunConfig,
    window: TimeWindow,
    filename: &Path,
) -> AppResult<()> {
    let plan = collect::plan(provider, config, window).await?;
    let snapshot = collect::execute(provider, &plan).await?;

    let datapoints: usize = snapshot
        .results
        .iter()
        .map(|record| record.datapoints.len())
        .sum();
    write_snapshot(filename, &snapshot).await?;
    tracing::info!(
        "Collected {} record(s) with {} datapoint(s)",
        snapshot.results.len(),
        datapoints
    );
    println!("Wrote results to file: {}", filename.display());
    Ok(())
}
