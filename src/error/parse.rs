use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid time '{value}'. Expected local time in format YYYYMMDDhhmm: {source}")]
    InvalidAnchor {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Local time '{value}' does not exist in the local time zone.")]
    NonexistentLocalTime { value: String },
    #[error("Time window overflows the supported date range.")]
    WindowOverflow,
    #[error("Invalid dimensions '{value}'. Expected {{\"Name\":\"STRING\",\"Value\":\"STRING\"}} or a list of them: {source}")]
    InvalidDimensions {
        value: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Dimension filter name must not be empty.")]
    EmptyDimensionName,
    #[error("Invalid statistic '{value}'. Use SampleCount, Average, Sum, Minimum, or Maximum.")]
    InvalidStatistic { value: String },
}
