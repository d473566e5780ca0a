use crate::domain::{MetricIdentity, QueryDescriptor, StatisticKind};

/// Expands `metrics × statistics` into one batch, metric-major.
///
/// Ids are `<statistic><n>` where `n` counts across the whole batch, so every
/// id is distinct no matter how many statistics share a metric.
#[must_use]
pub fn build_batch(
    metrics: &[MetricIdentity],
    statistics: &[StatisticKind],
    period_seconds: u32,
) -> Vec<QueryDescriptor> {
    let mut batch = Vec::with_capacity(metrics.len().saturating_mul(statistics.len()));
    let mut counter = 0usize;
    for metric in metrics {
        for statistic in statistics {
            batch.push(QueryDescriptor {
                id: format!("{}{}", statistic.id_prefix(), counter),
                metric: metric.clone(),
                statistic: *statistic,
                period_seconds,
            });
            counter = counter.saturating_add(1);
        }
    }
    batch
}
