//! AWS CloudWatch over the AWS JSON 1.0 protocol, signed with SigV4.
mod client;
mod signing;
mod wire;


pub use client::{CloudWatchProvider, ProviderSettings};
pub use signing::AwsCredentials;
