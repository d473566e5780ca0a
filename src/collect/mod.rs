//! One discovery → batch → fetch → correlate cycle.
//!
//! Every step runs sequentially against the injected provider; nothing here
//! holds state between invocations.
mod batch;
mod catalog;
mod fetch;
mod window;

#[cfg(test)]
mod tests;

pub use batch::build_batch;
pub use catalog::MetricCatalogFetcher;
pub use fetch::{MetricsDataClient, correlate};
pub use window::{ANCHOR_FORMAT, resolve_window};

use crate::config::RunConfig;
use crate::domain::{QueryDescriptor, Snapshot, TimeWindow};
use crate::error::{AppResult, Phase};
use crate::provider::MetricsProvider;

/// The queries a run will execute, before anything is fetched.
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    pub window: TimeWindow,
    pub period_seconds: u32,
    pub batch: Vec<QueryDescriptor>,
}

/// Discovers the metric catalog and builds the query batch.
///
/// # Errors
///
/// Returns the discovery failure tagged with [`Phase::Discovery`].
pub async fn plan(
    provider: &dyn MetricsProvider,
    config: &RunConfig,
    window: TimeWindow,
) -> AppResult<CollectionPlan> {
    let catalog = MetricCatalogFetcher::new(provider)
        .fetch(config.namespace.as_deref(), &config.dimensions)
        .await
        .map_err(|err| err.in_phase(Phase::Discovery))?;
    let period_seconds = config.period_seconds.get();
    let batch = build_batch(&catalog, &config.statistics, period_seconds);
    tracing::debug!(
        "Planned {} quer{} ({} metric(s) x {} statistic(s))",
        batch.len(),
        if batch.len() == 1 { "y" } else { "ies" },
        catalog.len(),
        config.statistics.len()
    );
    Ok(CollectionPlan {
        window,
        period_seconds,
        batch,
    })
}

/// Executes a plan and returns the correlated snapshot.
///
/// # Errors
///
/// Returns the execution or correlation failure tagged with
/// [`Phase::Query`].
pub async fn execute(provider: &dyn MetricsProvider, plan: &CollectionPlan) -> AppResult<Snapshot> {
    let results = MetricsDataClient::new(provider)
        .fetch(plan.window, &plan.batch)
        .await
        .map_err(|err| err.in_phase(Phase::Query))?;
    Ok(Snapshot {
        window: plan.window,
        period_seconds: plan.period_seconds,
        results,
    })
}
