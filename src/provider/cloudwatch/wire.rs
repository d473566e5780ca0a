//! JSON shapes of the CloudWatch `ListMetrics` and `GetMetricData` calls.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Dimension, DimensionFilter, MetricIdentity, QueryDescriptor, ResultStatus};
use crate::error::{AppError, AppResult, ProviderError};
use crate::provider::MetricDataResult;

/// Datapoint ordering requested from `GetMetricData`.
const SCAN_BY_ASCENDING: &str = "TimestampAscending";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ListMetricsInput<'req> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'req str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub dimensions: &'req [DimensionFilter],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'req str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ListMetricsOutput {
    #[serde(default)]
    pub metrics: Vec<WireMetric>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireMetric {
    pub namespace: String,
    pub metric_name: String,
    #[serde(default)]
    pub dimensions: Vec<WireDimension>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireDimension {
    pub name: String,
    pub value: String,
}

impl From<WireMetric> for MetricIdentity {
    fn from(metric: WireMetric) -> Self {
        MetricIdentity::new(
            metric.namespace,
            metric.metric_name,
            metric
                .dimensions
                .into_iter()
                .map(|dimension| Dimension::new(dimension.name, dimension.value)),
        )
    }
}

impl From<&MetricIdentity> for WireMetric {
    fn from(metric: &MetricIdentity) -> Self {
        Self {
            namespace: metric.namespace.clone(),
            metric_name: metric.name.clone(),
            dimensions: metric
                .dimensions
                .iter()
                .map(|dimension| WireDimension {
                    name: dimension.name.clone(),
                    value: dimension.value.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct GetMetricDataInput<'req> {
    pub metric_data_queries: &'req [WireQuery],
    pub start_time: i64,
    pub end_time: i64,
    pub scan_by: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'req str>,
}

impl<'req> GetMetricDataInput<'req> {
    pub(super) const fn new(
        queries: &'req [WireQuery],
        start_time: i64,
        end_time: i64,
        next_token: Option<&'req str>,
    ) -> Self {
        Self {
            metric_data_queries: queries,
            start_time,
            end_time,
            scan_by: SCAN_BY_ASCENDING,
            next_token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireQuery {
    pub id: String,
    pub metric_stat: WireMetricStat,
    pub return_data: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireMetricStat {
    pub metric: WireMetric,
    pub period: u32,
    pub stat: &'static str,
}

impl From<&QueryDescriptor> for WireQuery {
    fn from(query: &QueryDescriptor) -> Self {
        Self {
            id: query.id.clone(),
            metric_stat: WireMetricStat {
                metric: WireMetric::from(&query.metric),
                period: query.period_seconds,
                stat: query.statistic.as_str(),
            },
            return_data: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct GetMetricDataOutput {
    #[serde(default)]
    pub metric_data_results: Vec<WireResult>,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamps: Vec<serde_json::Number>,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub status_code: Option<ResultStatus>,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireMessage {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl WireMessage {
    pub(super) fn render(&self) -> String {
        match (self.code.as_deref(), self.value.as_deref()) {
            (Some(code), Some(value)) => format!("{}: {}", code, value),
            (Some(text), None) | (None, Some(text)) => text.to_owned(),
            (None, None) => String::new(),
        }
    }
}

impl WireResult {
    pub(super) fn into_result(self) -> AppResult<MetricDataResult> {
        let id_label = self.id.clone().unwrap_or_default();
        let mut timestamps = Vec::with_capacity(self.timestamps.len());
        for raw in &self.timestamps {
            timestamps.push(epoch_to_utc(raw).ok_or_else(|| {
                AppError::provider(ProviderError::InvalidTimestamp {
                    id: id_label.clone(),
                    value: raw.as_f64().unwrap_or(f64::NAN),
                })
            })?);
        }
        Ok(MetricDataResult {
            id: self.id,
            status: self.status_code.unwrap_or(ResultStatus::Complete),
            timestamps,
            values: self.values,
            messages: self.messages.iter().map(WireMessage::render).collect(),
        })
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(super) struct WireError {
    #[serde(rename = "__type", default)]
    pub error_type: Option<String>,
    #[serde(alias = "Message", default)]
    pub message: Option<String>,
}

impl WireError {
    /// Error code without the shape namespace (`com.amazonaws...#Code`).
    pub(super) fn code(&self) -> String {
        self.error_type
            .as_deref()
            .map(|value| value.rsplit('#').next().unwrap_or(value))
            .unwrap_or("UnknownError")
            .to_owned()
    }
}

/// Timestamps arrive as epoch seconds; CloudWatch datapoints fall on whole
/// seconds so any fraction is dropped.
fn epoch_to_utc(raw: &serde_json::Number) -> Option<DateTime<Utc>> {
    let seconds = match raw.as_i64() {
        Some(seconds) => seconds,
        None => {
            let value = raw.as_f64()?;
            if !value.is_finite() {
                return None;
            }
            value.trunc() as i64
        }
    };
    DateTime::from_timestamp(seconds, 0)
}
