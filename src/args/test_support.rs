use clap::Parser;

use crate::error::{AppError, AppResult};

use super::CollectArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<CollectArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CollectArgs::try_parse_from(args).map_err(AppError::from)
}
