use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::args::DEFAULT_USER_AGENT;
use crate::domain::MetricIdentity;
use crate::error::{AppError, AppResult, ConnectionError, ProviderError};
use crate::provider::{
    GetMetricDataRequest, GetMetricDataResponse, ListMetricsPage, ListMetricsRequest,
    MetricDataResult, MetricsProvider,
};

use super::signing::{AwsCredentials, apply_sigv4};
use super::wire::{
    GetMetricDataInput, GetMetricDataOutput, ListMetricsInput, ListMetricsOutput, WireError,
    WireQuery,
};

const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
const TARGET_PREFIX: &str = "GraniteServiceVersion20100801";
const LIST_METRICS: &str = "ListMetrics";
const GET_METRIC_DATA: &str = "GetMetricData";
/// Provider limit on queries per `GetMetricData` request.
pub(super) const MAX_QUERIES_PER_REQUEST: usize = 500;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and as whom to talk to CloudWatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub region: String,
    pub endpoint_url: Option<String>,
    pub credentials: Option<AwsCredentials>,
}

impl ProviderSettings {
    /// Endpoint for the configured region unless explicitly overridden.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.endpoint_url
            .clone()
            .unwrap_or_else(|| format!("https://monitoring.{}.amazonaws.com/", self.region))
    }
}

#[derive(Debug)]
pub struct CloudWatchProvider {
    http: reqwest::Client,
    endpoint: Url,
    region: String,
    credentials: AwsCredentials,
}

impl CloudWatchProvider {
    /// Builds a provider for the given settings.
    ///
    /// # Errors
    ///
    /// Returns a connection error when credentials are missing, the endpoint
    /// is not a valid URL, or the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings) -> AppResult<Self> {
        let credentials = settings
            .credentials
            .clone()
            .ok_or_else(|| AppError::connection(ConnectionError::MissingCredentials))?;
        let raw_endpoint = settings.endpoint();
        let endpoint = Url::parse(&raw_endpoint).map_err(|err| {
            AppError::connection(ConnectionError::InvalidEndpoint {
                url: raw_endpoint.clone(),
                source: err,
            })
        })?;
        let http = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| AppError::connection(ConnectionError::BuildClientFailed { source: err }))?;

        tracing::debug!("Using CloudWatch endpoint {} ({})", endpoint, settings.region);
        Ok(Self {
            http,
            endpoint,
            region: settings.region.clone(),
            credentials,
        })
    }

    pub(super) fn build_request<I>(
        &self,
        operation: &'static str,
        input: &I,
    ) -> AppResult<reqwest::RequestBuilder>
    where
        I: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(input).map_err(|err| {
            AppError::provider(ProviderError::EncodeRequest {
                operation,
                source: err,
            })
        })?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let headers = [
            ("content-type", CONTENT_TYPE),
            ("x-amz-target", target.as_str()),
        ];
        let builder = self.http.post(self.endpoint.clone());
        let builder = apply_sigv4(
            builder,
            &self.endpoint,
            &headers,
            &body,
            &self.credentials,
            &self.region,
        )?;
        Ok(builder.body(body))
    }

    async fn call<I, O>(&self, operation: &'static str, input: &I) -> AppResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let response = self
            .build_request(operation, input)?
            .send()
            .await
            .map_err(|err| {
                AppError::connection(ConnectionError::RequestFailed {
                    region: self.region.clone(),
                    operation,
                    source: err,
                })
            })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| AppError::connection(ConnectionError::ReadResponse { operation, source: err }))?;

        if !status.is_success() {
            let error: WireError = serde_json::from_slice(&bytes).unwrap_or_default();
            return Err(AppError::provider(ProviderError::Api {
                operation,
                status: status.as_u16(),
                code: error.code(),
                message: error.message.unwrap_or_default(),
            }));
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            AppError::provider(ProviderError::DecodeResponse {
                operation,
                source: err,
            })
        })
    }
}

#[async_trait]
impl MetricsProvider for CloudWatchProvider {
    async fn list_metrics(&self, request: ListMetricsRequest<'_>) -> AppResult<ListMetricsPage> {
        let input = ListMetricsInput {
            namespace: request.namespace,
            dimensions: request.dimensions,
            next_token: request.next_token,
        };
        let output: ListMetricsOutput = self.call(LIST_METRICS, &input).await?;
        Ok(ListMetricsPage {
            metrics: output
                .metrics
                .into_iter()
                .map(MetricIdentity::from)
                .collect(),
            next_token: output.next_token,
        })
    }

    async fn get_metric_data(
        &self,
        request: GetMetricDataRequest<'_>,
    ) -> AppResult<GetMetricDataResponse> {
        let start_time = request.window.start.timestamp();
        let end_time = request.window.end.timestamp();
        let mut merged = ResultMerger::with_capacity(request.queries.len());

        for (chunk_index, chunk) in request.queries.chunks(MAX_QUERIES_PER_REQUEST).enumerate() {
            let queries: Vec<WireQuery> = chunk.iter().map(WireQuery::from).collect();
            let mut next_token: Option<String> = None;
            let mut pages = 0usize;
            loop {
                let input =
                    GetMetricDataInput::new(&queries, start_time, end_time, next_token.as_deref());
                let output: GetMetricDataOutput = self.call(GET_METRIC_DATA, &input).await?;
                for message in &output.messages {
                    tracing::warn!("GetMetricData: {}", message.render());
                }
                for wire in output.metric_data_results {
                    merged.push(wire.into_result()?);
                }
                pages = pages.saturating_add(1);
                match output.next_token.filter(|token| !token.is_empty()) {
                    Some(token) => next_token = Some(token),
                    None => break,
                }
            }
            tracing::debug!(
                "GetMetricData chunk {} ({} queries) fetched in {} page(s)",
                chunk_index,
                chunk.len(),
                pages
            );
        }

        Ok(GetMetricDataResponse {
            results: merged.finish(),
        })
    }
}

/// Folds result pages into one entry per query id, keeping first-seen order.
#[derive(Debug, Default)]
pub(super) struct ResultMerger {
    results: Vec<MetricDataResult>,
    positions: HashMap<String, usize>,
}

impl ResultMerger {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub(super) fn push(&mut self, result: MetricDataResult) {
        let existing = result
            .id
            .as_ref()
            .and_then(|id| self.positions.get(id).copied())
            .and_then(|position| self.results.get_mut(position));
        match existing {
            Some(entry) => {
                entry.timestamps.extend(result.timestamps);
                entry.values.extend(result.values);
                entry.messages.extend(result.messages);
                // Later pages carry the final status unless an earlier page failed.
                if !entry.status.is_error() {
                    entry.status = result.status;
                }
            }
            None => {
                if let Some(id) = result.id.clone() {
                    self.positions.insert(id, self.results.len());
                }
                self.results.push(result);
            }
        }
    }

    pub(super) fn finish(self) -> Vec<MetricDataResult> {
        self.results
    }
}
