use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MetricIdentity, StatisticKind, TimeWindow};

/// One unit of the batched statistical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub id: String,
    pub metric: MetricIdentity,
    pub statistic: StatisticKind,
    pub period_seconds: u32,
}

/// Per-query status reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Complete,
    PartialData,
    InternalError,
    Forbidden,
}

impl ResultStatus {
    /// Whether the query failed outright on the provider side.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, ResultStatus::InternalError | ResultStatus::Forbidden)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ResultStatus::Complete => "Complete",
            ResultStatus::PartialData => "PartialData",
            ResultStatus::InternalError => "InternalError",
            ResultStatus::Forbidden => "Forbidden",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Datapoints of one query, tied back to the metric and statistic that
/// produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub metric: MetricIdentity,
    pub statistic: StatisticKind,
    pub datapoints: Vec<Datapoint>,
}

/// Everything persisted for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub window: TimeWindow,
    pub period_seconds: u32,
    pub results: Vec<ResultRecord>,
}
