use std::path::PathBuf;

use clap::Parser;

use super::defaults::DEFAULT_REGION;
use super::parsers::{
    parse_bool_env, parse_dimensions, parse_positive_u32, parse_positive_u64, parse_statistic,
};
use super::types::{DimensionFilters, PositiveU32, PositiveU64};
use crate::domain::StatisticKind;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Dump CloudWatch metric statistics for one time window into a snapshot file.",
    next_help_heading = "Advanced Options"
)]
pub struct CollectArgs {
    /// The name of the region to connect to
    #[arg(long, default_value = DEFAULT_REGION, help_heading = "Common Options")]
    pub region: String,

    /// Start time of the query in format "YYYYMMDDhhmm", local time (default: last full interval)
    #[arg(long, help_heading = "Common Options")]
    pub time: Option<String>,

    /// Minutes of time range in the query
    #[arg(
        long,
        default_value = "60",
        value_parser = parse_positive_u64,
        help_heading = "Common Options"
    )]
    pub interval: PositiveU64,

    /// Seconds to aggregate in the query
    #[arg(
        long,
        default_value = "60",
        value_parser = parse_positive_u32,
        help_heading = "Common Options"
    )]
    pub period: PositiveU32,

    /// Metrics namespace to dump (default: all namespaces)
    #[arg(long, default_value = "", help_heading = "Common Options")]
    pub namespace: String,

    /// Filter metrics, usage: {"Name":"STRING","Value":"STRING"} or a JSON list of them
    #[arg(long, value_parser = parse_dimensions, help_heading = "Common Options")]
    pub dimensions: Option<DimensionFilters>,

    /// Statistics to collect for every metric (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "Average,Sum",
        value_parser = parse_statistic
    )]
    pub statistics: Vec<StatisticKind>,

    /// Print only the metrics and their statistics without fetching data
    #[arg(long, help_heading = "Common Options")]
    pub check: bool,

    /// File to save data
    #[arg(long, help_heading = "Common Options")]
    pub filename: Option<PathBuf>,

    /// Override the CloudWatch endpoint (e.g. for a local emulator)
    #[arg(long = "endpoint-url")]
    pub endpoint_url: Option<String>,

    /// AWS access key id
    #[arg(long = "aws-access-key-id", env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key
    #[arg(
        long = "aws-secret-access-key",
        env = "AWS_SECRET_ACCESS_KEY",
        hide_env_values = true
    )]
    pub aws_secret_access_key: Option<String>,

    /// AWS session token
    #[arg(long = "aws-session-token", env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub aws_session_token: Option<String>,

    /// Path to config file (TOML or JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by CWDUMP_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
