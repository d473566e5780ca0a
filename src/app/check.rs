use std::fmt::Write as _;

use crate::collect::{self, CollectionPlan};
use crate::config::RunConfig;
use crate::domain::TimeWindow;
use crate::error::{AppError, AppResult, SinkError};
use crate::provider::MetricsProvider;

/// Discovers the catalog and prints what a full run would query.
pub(crate) async fn run_check(
    provider: &dyn MetricsProvider,
    config: &RunConfig,
    window: TimeWindow,
) -> AppResult<()> {
    let plan = collect::plan(provider, config, window).await?;
    print!("{}", render_check(&plan)?);
    Ok(())
}

pub(crate) fn render_check(plan: &CollectionPlan) -> AppResult<String> {
    let mut output = String::new();
    write_line(&mut output, format_args!("start : {}", plan.window.start.to_rfc3339()))?;
    write_line(&mut output, format_args!("end   : {}", plan.window.end.to_rfc3339()))?;
    write_line(&mut output, format_args!("period: {} s", plan.period_seconds))?;
    for query in &plan.batch {
        write_line(
            &mut output,
            format_args!("will collect metric: {} {}", query.metric, query.statistic),
        )?;
    }
    Ok(output)
}

fn write_line(output: &mut String, line: std::fmt::Arguments<'_>) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::RenderReport { source: err }))
}
