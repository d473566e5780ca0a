mod app;
mod config;
mod connection;
mod parse;
mod provider;
mod sink;
mod validation;

pub use app::{AppError, AppResult, Phase};
pub use config::ConfigError;
pub use connection::ConnectionError;
pub use parse::ParseError;
pub use provider::ProviderError;
pub use sink::SinkError;
pub use validation::ValidationError;
