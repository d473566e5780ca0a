mod check;
mod collect;

pub(crate) use check::run_check;
pub(crate) use collect::run_collect;
