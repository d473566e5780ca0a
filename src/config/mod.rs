//! Configuration loading and the immutable run configuration.
mod apply;
mod loader;
mod run;
pub mod types;


pub use apply::{apply_config, build_run_config};
pub use loader::load_config;
pub use run::RunConfig;

#[cfg(test)]
pub(crate) use loader::load_config_file;
