use std::collections::HashMap;

use crate::domain::{Datapoint, QueryDescriptor, ResultRecord, ResultStatus, TimeWindow};
use crate::error::{AppError, AppResult, ProviderError};
use crate::provider::{GetMetricDataRequest, MetricDataResult, MetricsProvider};

/// Runs a query batch and ties each result back to its descriptor.
pub struct MetricsDataClient<'provider> {
    provider: &'provider dyn MetricsProvider,
}

impl<'provider> MetricsDataClient<'provider> {
    #[must_use]
    pub const fn new(provider: &'provider dyn MetricsProvider) -> Self {
        Self { provider }
    }

    /// Submits `batch` as a single provider call and returns one record per
    /// descriptor, in batch order. An empty batch makes no call.
    ///
    /// # Errors
    ///
    /// Returns the provider's connection or API error, or a provider error
    /// when results cannot be correlated or any query failed.
    pub async fn fetch(
        &self,
        window: TimeWindow,
        batch: &[QueryDescriptor],
    ) -> AppResult<Vec<ResultRecord>> {
        if batch.is_empty() {
            tracing::info!("No queries to execute");
            return Ok(Vec::new());
        }

        tracing::info!(
            "Executing {} quer{} from {} to {}",
            batch.len(),
            if batch.len() == 1 { "y" } else { "ies" },
            window.start.to_rfc3339(),
            window.end.to_rfc3339()
        );
        let response = self
            .provider
            .get_metric_data(GetMetricDataRequest {
                queries: batch,
                window,
            })
            .await?;
        correlate(batch, response.results)
    }
}

/// Pairs provider results with the descriptors that produced them.
///
/// When every result echoes an id, results are matched by id and may arrive
/// in any order. When none do, the provider's ordering guarantee is the only
/// link and results are matched by position. Either way any query the
/// provider marked as failed fails the whole batch.
///
/// # Errors
///
/// Returns a provider error for count mismatches, unknown, duplicate or
/// missing ids, a mix of echoed and bare results, failed queries, and
/// results whose timestamps and values differ in length.
pub fn correlate(
    batch: &[QueryDescriptor],
    results: Vec<MetricDataResult>,
) -> AppResult<Vec<ResultRecord>> {
    let echoed = results.iter().filter(|result| result.id.is_some()).count();
    let ordered = if echoed == 0 {
        if results.len() != batch.len() {
            return Err(AppError::provider(ProviderError::ResultCountMismatch {
                expected: batch.len(),
                actual: results.len(),
            }));
        }
        results
    } else if echoed == results.len() {
        order_by_id(batch, results)?
    } else {
        return Err(AppError::provider(ProviderError::MixedCorrelation));
    };

    batch
        .iter()
        .zip(ordered)
        .map(|(descriptor, result)| into_record(descriptor, result))
        .collect()
}

fn order_by_id(
    batch: &[QueryDescriptor],
    results: Vec<MetricDataResult>,
) -> AppResult<Vec<MetricDataResult>> {
    let positions: HashMap<&str, usize> = batch
        .iter()
        .enumerate()
        .map(|(position, descriptor)| (descriptor.id.as_str(), position))
        .collect();
    let mut slots: Vec<Option<MetricDataResult>> = Vec::new();
    slots.resize_with(batch.len(), || None);

    let mut reordered = false;
    for (index, result) in results.into_iter().enumerate() {
        let id = result.id.clone().unwrap_or_default();
        let Some(&position) = positions.get(id.as_str()) else {
            return Err(AppError::provider(ProviderError::UnknownResultId { id }));
        };
        reordered |= position != index;
        match slots.get_mut(position) {
            Some(slot) if slot.is_none() => *slot = Some(result),
            Some(_) | None => {
                return Err(AppError::provider(ProviderError::DuplicateResultId { id }));
            }
        }
    }
    if reordered {
        tracing::warn!("Provider returned results out of submission order; matched them by id");
    }

    batch
        .iter()
        .zip(slots)
        .map(|(descriptor, slot)| {
            slot.ok_or_else(|| {
                AppError::provider(ProviderError::MissingResult {
                    id: descriptor.id.clone(),
                })
            })
        })
        .collect()
}

fn into_record(descriptor: &QueryDescriptor, result: MetricDataResult) -> AppResult<ResultRecord> {
    if result.status.is_error() {
        return Err(AppError::provider(ProviderError::QueryFailed {
            id: descriptor.id.clone(),
            status: result.status,
            message: if result.messages.is_empty() {
                "no message from provider".to_owned()
            } else {
                result.messages.join("; ")
            },
        }));
    }
    if result.status == ResultStatus::PartialData {
        tracing::warn!(
            "Query {} ({} {}) returned partial data",
            descriptor.id,
            descriptor.metric,
            descriptor.statistic
        );
    }
    if result.timestamps.len() != result.values.len() {
        return Err(AppError::provider(ProviderError::MalformedResult {
            id: descriptor.id.clone(),
            timestamps: result.timestamps.len(),
            values: result.values.len(),
        }));
    }

    Ok(ResultRecord {
        metric: descriptor.metric.clone(),
        statistic: descriptor.statistic,
        datapoints: result
            .timestamps
            .into_iter()
            .zip(result.values)
            .map(|(timestamp, value)| Datapoint { timestamp, value })
            .collect(),
    })
}
