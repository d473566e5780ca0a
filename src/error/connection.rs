use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(
        "Missing AWS credentials. Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY (or pass --aws-access-key-id/--aws-secret-access-key)."
    )]
    MissingCredentials,
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to connect to region {region}: {operation} request failed: {source}")]
    RequestFailed {
        region: String,
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read {operation} response: {source}")]
    ReadResponse {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build sigv4 params: {source}")]
    SigV4Params {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to build sigv4 request: {source}")]
    SigV4Request {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to sign request: {source}")]
    SigV4Sign {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to build sign request: {source}")]
    SigV4BuildSign {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
