use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{CollectArgs, DimensionFilters, PositiveU32, PositiveU64, parse_dimensions};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::provider::{AwsCredentials, ProviderSettings};

use super::run::RunConfig;
use super::types::{ConfigFile, DimensionsValue};

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

/// Applies configuration file values to CLI arguments that were not given on
/// the command line.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut CollectArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "region")
        && let Some(region) = config.region.clone()
    {
        args.region = region;
    }

    if !is_cli(matches, "interval")
        && let Some(interval) = config.interval
    {
        args.interval = PositiveU64::try_from(interval).map_err(|_err| {
            AppError::config(ConfigError::FieldMustBePositive { field: "interval" })
        })?;
    }

    if !is_cli(matches, "period")
        && let Some(period) = config.period
    {
        args.period = PositiveU32::try_from(period)
            .map_err(|_err| AppError::config(ConfigError::FieldMustBePositive { field: "period" }))?;
    }

    if !is_cli(matches, "namespace")
        && let Some(namespace) = config.namespace.clone()
    {
        args.namespace = namespace;
    }

    if !is_cli(matches, "dimensions")
        && let Some(dimensions) = config.dimensions.as_ref()
    {
        args.dimensions = Some(match dimensions {
            DimensionsValue::List(filters) => DimensionFilters::new(filters.clone()),
            DimensionsValue::Single(filter) => DimensionFilters::new(vec![filter.clone()]),
            DimensionsValue::Json(raw) => parse_dimensions(raw)
                .map_err(|err| AppError::config(ConfigError::InvalidDimensions { source: err }))?,
        });
    }

    if !is_cli(matches, "statistics")
        && let Some(statistics) = config.statistics.clone()
    {
        args.statistics = statistics;
    }

    if !is_cli(matches, "filename")
        && let Some(filename) = config.filename.clone()
    {
        args.filename = Some(filename);
    }

    if !is_cli(matches, "endpoint_url")
        && let Some(endpoint_url) = config.endpoint_url.clone()
    {
        args.endpoint_url = Some(endpoint_url);
    }

    Ok(())
}

/// Freezes parsed arguments into the configuration the pipeline runs with.
///
/// # Errors
///
/// Returns a validation error when no statistics are configured.
pub fn build_run_config(args: &CollectArgs) -> AppResult<RunConfig> {
    if args.statistics.is_empty() {
        return Err(AppError::validation(ValidationError::NoStatistics));
    }

    let credentials = match (
        args.aws_access_key_id.as_ref(),
        args.aws_secret_access_key.as_ref(),
    ) {
        (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
            access_key_id: access_key_id.clone(),
            secret_access_key: secret_access_key.clone(),
            session_token: args.aws_session_token.clone(),
        }),
        (Some(_), None) | (None, Some(_)) | (None, None) => None,
    };

    Ok(RunConfig {
        anchor: args.time.clone(),
        interval_minutes: args.interval,
        period_seconds: args.period,
        namespace: Some(args.namespace.clone()).filter(|value| !value.is_empty()),
        dimensions: args
            .dimensions
            .clone()
            .map(DimensionFilters::into_inner)
            .unwrap_or_default(),
        statistics: args.statistics.clone(),
        provider: ProviderSettings {
            region: args.region.clone(),
            endpoint_url: args.endpoint_url.clone(),
            credentials,
        },
    })
}
