use thiserror::Error;

use crate::domain::ResultStatus;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{operation} returned HTTP {status}: {code}: {message}")]
    Api {
        operation: &'static str,
        status: u16,
        code: String,
        message: String,
    },
    #[error("Failed to encode {operation} request: {source}")]
    EncodeRequest {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to decode {operation} response: {source}")]
    DecodeResponse {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Provider returned {actual} results for {expected} queries.")]
    ResultCountMismatch { expected: usize, actual: usize },
    #[error("Provider returned a result for unknown query id '{id}'.")]
    UnknownResultId { id: String },
    #[error("Provider returned more than one result for query id '{id}'.")]
    DuplicateResultId { id: String },
    #[error("Provider returned no result for query id '{id}'.")]
    MissingResult { id: String },
    #[error("Provider mixed results with and without query ids; cannot correlate.")]
    MixedCorrelation,
    #[error("Query '{id}' failed with status {status}: {message}")]
    QueryFailed {
        id: String,
        status: ResultStatus,
        message: String,
    },
    #[error("Query '{id}' returned {timestamps} timestamps but {values} values.")]
    MalformedResult {
        id: String,
        timestamps: usize,
        values: usize,
    },
    #[error("Query '{id}' returned an out-of-range timestamp {value}.")]
    InvalidTimestamp { id: String, value: f64 },
}
