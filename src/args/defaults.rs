pub(crate) const DEFAULT_USER_AGENT: &str = concat!("cwdump/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_REGION: &str = "us-east-1";

/// Config files picked up from the working directory when `--config` is not
/// given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["cwdump.toml", "cwdump.json"];
