//! Provider seam: the two calls the collection pipeline makes.
//!
//! The pipeline only sees [`MetricsProvider`]; the production implementation
//! is [`cloudwatch::CloudWatchProvider`], tests substitute scripted fakes.
pub mod cloudwatch;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DimensionFilter, MetricIdentity, QueryDescriptor, ResultStatus, TimeWindow};
use crate::error::AppResult;

pub use cloudwatch::{AwsCredentials, CloudWatchProvider, ProviderSettings};

/// One page request of the metric listing.
#[derive(Debug, Clone, Copy)]
pub struct ListMetricsRequest<'req> {
    pub namespace: Option<&'req str>,
    pub dimensions: &'req [DimensionFilter],
    pub next_token: Option<&'req str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMetricsPage {
    pub metrics: Vec<MetricIdentity>,
    pub next_token: Option<String>,
}

/// A batched statistical query over one window.
#[derive(Debug, Clone, Copy)]
pub struct GetMetricDataRequest<'req> {
    pub queries: &'req [QueryDescriptor],
    pub window: TimeWindow,
}

/// Raw per-query result as the provider reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDataResult {
    /// Query id echoed back by the provider, when it echoes one.
    pub id: Option<String>,
    pub status: ResultStatus,
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetMetricDataResponse {
    pub results: Vec<MetricDataResult>,
}

#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Fetches one page of the metric listing.
    ///
    /// # Errors
    ///
    /// Returns a connection error when the provider is unreachable and a
    /// provider error when the call is rejected.
    async fn list_metrics(&self, request: ListMetricsRequest<'_>) -> AppResult<ListMetricsPage>;

    /// Executes a batch of queries. Results must come back in submission
    /// order.
    ///
    /// # Errors
    ///
    /// Returns a connection error when the provider is unreachable and a
    /// provider error when the call is rejected.
    async fn get_metric_data(
        &self,
        request: GetMetricDataRequest<'_>,
    ) -> AppResult<GetMetricDataResponse>;
}
