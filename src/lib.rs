//! Core library for the `cwdump` CLI.
//!
//! The binary resolves a time window, discovers the CloudWatch metric
//! catalog for a namespace and dimension filter, fetches every requested
//! statistic in batched calls and writes the correlated results as one JSON
//! snapshot. The modules below are the building blocks of that pipeline; the
//! command-line application remains the primary interface.
mod app;
pub mod args;
pub mod collect;
pub mod config;
pub mod domain;
pub mod entry;
pub mod error;
pub mod provider;
pub mod sinks;
pub mod system;
