use thiserror::Error;

use super::{
    ConfigError, ConnectionError, ParseError, ProviderError, SinkError, ValidationError,
};

/// Pipeline stage an error surfaced from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[error("metric discovery")]
    Discovery,
    #[error("query execution")]
    Query,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("{phase} failed: {source}")]
    Phase {
        phase: Phase,
        #[source]
        source: Box<AppError>,
    },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn connection<E>(error: E) -> Self
    where
        E: Into<ConnectionError>,
    {
        error.into().into()
    }

    pub fn parse<E>(error: E) -> Self
    where
        E: Into<ParseError>,
    {
        error.into().into()
    }

    pub fn provider<E>(error: E) -> Self
    where
        E: Into<ProviderError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn sink<E>(error: E) -> Self
    where
        E: Into<SinkError>,
    {
        error.into().into()
    }

    /// Tags the error with the pipeline phase it came from.
    #[must_use]
    pub fn in_phase(self, phase: Phase) -> Self {
        match self {
            already @ AppError::Phase { .. } => already,
            other => AppError::Phase {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// Phase the error was tagged with, if any.
    #[must_use]
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            AppError::Phase { phase, .. } => Some(*phase),
            AppError::Io { .. }
            | AppError::Clap { .. }
            | AppError::Connection(_)
            | AppError::Parse(_)
            | AppError::Provider(_)
            | AppError::Config(_)
            | AppError::Validation(_)
            | AppError::Sink(_) => None,
        }
    }
}
