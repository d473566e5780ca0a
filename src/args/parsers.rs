use super::types::{DimensionFilters, PositiveU32, PositiveU64};
use crate::domain::{DimensionFilter, StatisticKind};
use crate::error::{AppError, AppResult, ParseError, ValidationError};

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_u32(s: &str) -> AppResult<PositiveU32> {
    s.parse::<PositiveU32>().map_err(AppError::from)
}

pub(super) fn parse_statistic(s: &str) -> AppResult<StatisticKind> {
    s.parse::<StatisticKind>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

/// Parses a JSON dimension filter: one `{"Name": .., "Value": ..}` object or a
/// list of them. `Value` may be omitted.
pub(crate) fn parse_dimensions(s: &str) -> Result<DimensionFilters, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(s).map_err(|err| ParseError::InvalidDimensions {
            value: s.to_owned(),
            source: err,
        })?;
    let filters = if value.is_array() {
        serde_json::from_value::<Vec<DimensionFilter>>(value)
    } else {
        serde_json::from_value::<DimensionFilter>(value).map(|filter| vec![filter])
    }
    .map_err(|err| ParseError::InvalidDimensions {
        value: s.to_owned(),
        source: err,
    })?;

    if filters.iter().any(|filter| filter.name.trim().is_empty()) {
        return Err(ParseError::EmptyDimensionName);
    }
    Ok(DimensionFilters::new(filters))
}
