use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Name/value tag qualifying a metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Listing filter on a dimension. A missing value matches any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionFilter {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(
        rename = "Value",
        alias = "value",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

/// A metric as discovered from the provider.
///
/// Dimensions are held as a set, so two identities compare equal regardless
/// of the order the provider listed their dimensions in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricIdentity {
    pub namespace: String,
    pub name: String,
    pub dimensions: BTreeSet<Dimension>,
}

impl MetricIdentity {
    #[must_use]
    pub fn new<I>(namespace: impl Into<String>, name: impl Into<String>, dimensions: I) -> Self
    where
        I: IntoIterator<Item = Dimension>,
    {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            dimensions: dimensions.into_iter().collect(),
        }
    }
}

impl fmt::Display for MetricIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)?;
        if self.dimensions.is_empty() {
            return Ok(());
        }
        f.write_str(" [")?;
        for (index, dimension) in self.dimensions.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", dimension.name, dimension.value)?;
        }
        f.write_str("]")
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum StatisticKind {
    SampleCount,
    Average,
    Sum,
    Minimum,
    Maximum,
}

impl StatisticKind {
    /// Statistics queried when none are configured.
    pub const DEFAULTS: [StatisticKind; 2] = [StatisticKind::Average, StatisticKind::Sum];

    /// Provider spelling of the statistic.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StatisticKind::SampleCount => "SampleCount",
            StatisticKind::Average => "Average",
            StatisticKind::Sum => "Sum",
            StatisticKind::Minimum => "Minimum",
            StatisticKind::Maximum => "Maximum",
        }
    }

    /// Lower-case prefix used for query ids.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            StatisticKind::SampleCount => "samplecount",
            StatisticKind::Average => "average",
            StatisticKind::Sum => "sum",
            StatisticKind::Minimum => "minimum",
            StatisticKind::Maximum => "maximum",
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatisticKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "samplecount" => Ok(StatisticKind::SampleCount),
            "average" => Ok(StatisticKind::Average),
            "sum" => Ok(StatisticKind::Sum),
            "minimum" => Ok(StatisticKind::Minimum),
            "maximum" => Ok(StatisticKind::Maximum),
            _ => Err(ParseError::InvalidStatistic {
                value: s.to_owned(),
            }),
        }
    }
}
