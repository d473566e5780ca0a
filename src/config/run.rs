use chrono::TimeDelta;

use crate::args::{PositiveU32, PositiveU64};
use crate::domain::{DimensionFilter, StatisticKind};
use crate::error::{AppError, AppResult, ParseError};
use crate::provider::ProviderSettings;

/// Everything one collection cycle needs, fixed before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Window anchor in local time (`YYYYMMDDhhmm`).
    pub anchor: Option<String>,
    pub interval_minutes: PositiveU64,
    pub period_seconds: PositiveU32,
    /// `None` lists every namespace.
    pub namespace: Option<String>,
    pub dimensions: Vec<DimensionFilter>,
    pub statistics: Vec<StatisticKind>,
    pub provider: ProviderSettings,
}

impl RunConfig {
    /// Window length.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the interval does not fit a time delta.
    pub fn interval(&self) -> AppResult<TimeDelta> {
        i64::try_from(self.interval_minutes.get())
            .ok()
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| AppError::parse(ParseError::WindowOverflow))
    }
}
