use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{DimensionFilter, StatisticKind};

/// Optional settings file (`cwdump.toml` / `cwdump.json`). Command-line
/// values take precedence over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub region: Option<String>,
    pub interval: Option<u64>,
    pub period: Option<u32>,
    pub namespace: Option<String>,
    pub dimensions: Option<DimensionsValue>,
    pub statistics: Option<Vec<StatisticKind>>,
    pub filename: Option<PathBuf>,
    pub endpoint_url: Option<String>,
}

/// Dimension filters as written in a config file: structured, or the same
/// JSON string `--dimensions` accepts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DimensionsValue {
    List(Vec<DimensionFilter>),
    Single(DimensionFilter),
    Json(String),
}
