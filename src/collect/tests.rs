use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use chrono_tz::America::New_York;

use super::*;
use crate::args::{PositiveU32, PositiveU64};
use crate::domain::{Dimension, DimensionFilter, MetricIdentity, ResultStatus, StatisticKind};
use crate::error::{AppError, ParseError, ProviderError};
use crate::provider::{
    GetMetricDataRequest, GetMetricDataResponse, ListMetricsPage, ListMetricsRequest,
    MetricDataResult, ProviderSettings,
};

type Responder = Box<dyn Fn(&[QueryDescriptor]) -> AppResult<GetMetricDataResponse> + Send + Sync>;

/// Provider fake serving scripted listing pages and computed query results.
struct ScriptedProvider {
    pages: Mutex<VecDeque<AppResult<ListMetricsPage>>>,
    list_calls: Mutex<Vec<(Option<String>, Option<String>)>>,
    data_calls: Mutex<usize>,
    responder: Responder,
}

impl ScriptedProvider {
    fn new<F>(pages: Vec<AppResult<ListMetricsPage>>, responder: F) -> Self
    where
        F: Fn(&[QueryDescriptor]) -> AppResult<GetMetricDataResponse> + Send + Sync + 'static,
    {
        Self {
            pages: Mutex::new(pages.into()),
            list_calls: Mutex::new(Vec::new()),
            data_calls: Mutex::new(0),
            responder: Box::new(responder),
        }
    }

    fn list_calls(&self) -> Vec<(Option<String>, Option<String>)> {
        self.list_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn data_calls(&self) -> usize {
        *self.data_calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MetricsProvider for ScriptedProvider {
    async fn list_metrics(&self, request: ListMetricsRequest<'_>) -> AppResult<ListMetricsPage> {
        self.list_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((
                request.namespace.map(str::to_owned),
                request.next_token.map(str::to_owned),
            ));
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(ListMetricsPage::default()))
    }

    async fn get_metric_data(
        &self,
        request: GetMetricDataRequest<'_>,
    ) -> AppResult<GetMetricDataResponse> {
        {
            let mut calls = self.data_calls.lock().unwrap_or_else(PoisonError::into_inner);
            *calls = calls.saturating_add(1);
        }
        (self.responder)(request.queries)
    }
}

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn metric(name: &str, instance: &str) -> MetricIdentity {
    MetricIdentity::new(
        "AWS/EC2",
        name,
        [Dimension::new("InstanceId", instance)],
    )
}

fn page(metrics: Vec<MetricIdentity>, next_token: Option<&str>) -> AppResult<ListMetricsPage> {
    Ok(ListMetricsPage {
        metrics,
        next_token: next_token.map(str::to_owned),
    })
}

fn numbered_metrics(prefix: &str, count: usize) -> Vec<MetricIdentity> {
    (0..count)
        .map(|index| metric(prefix, &format!("i-{}", index)))
        .collect()
}

fn at(seconds: i64) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| format!("Invalid timestamp {}", seconds))
}

fn window() -> Result<TimeWindow, String> {
    Ok(TimeWindow {
        start: at(1_705_311_000)?,
        end: at(1_705_314_600)?,
    })
}

/// One datapoint per query whose value is the query's position.
fn echo_results(queries: &[QueryDescriptor], with_ids: bool) -> Vec<MetricDataResult> {
    queries
        .iter()
        .enumerate()
        .map(|(position, query)| MetricDataResult {
            id: with_ids.then(|| query.id.clone()),
            status: ResultStatus::Complete,
            timestamps: Utc.timestamp_opt(1_705_311_000, 0).single().into_iter().collect(),
            values: vec![position as f64],
            messages: Vec::new(),
        })
        .collect()
}

fn run_config(statistics: Vec<StatisticKind>) -> Result<RunConfig, String> {
    Ok(RunConfig {
        anchor: None,
        interval_minutes: PositiveU64::try_from(60).map_err(|err| err.to_string())?,
        period_seconds: PositiveU32::try_from(300).map_err(|err| err.to_string())?,
        namespace: Some("AWS/EC2".to_owned()),
        dimensions: vec![DimensionFilter {
            name: "InstanceId".to_owned(),
            value: None,
        }],
        statistics,
        provider: ProviderSettings {
            region: "us-east-1".to_owned(),
            endpoint_url: None,
            credentials: None,
        },
    })
}

fn two_metric_batch() -> Vec<QueryDescriptor> {
    build_batch(
        &[metric("CPUUtilization", "i-1"), metric("NetworkIn", "i-2")],
        &StatisticKind::DEFAULTS,
        60,
    )
}

// --- window -----------------------------------------------------------------

#[test]
fn anchor_starts_window_in_local_time() -> Result<(), String> {
    let tokyo = FixedOffset::east_opt(9 * 3600).ok_or("Invalid offset")?;
    let now = tokyo
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .ok_or("Invalid now")?;
    let window = resolve_window(Some("202401150930"), TimeDelta::minutes(60), &now)
        .map_err(|err| err.to_string())?;

    let expected_start = Utc
        .with_ymd_and_hms(2024, 1, 15, 0, 30, 0)
        .single()
        .ok_or("Invalid start")?;
    let expected_end = Utc
        .with_ymd_and_hms(2024, 1, 15, 1, 30, 0)
        .single()
        .ok_or("Invalid end")?;
    if window.start != expected_start || window.end != expected_end {
        return Err(format!("Unexpected window: {:?}", window));
    }
    Ok(())
}

#[test]
fn window_length_always_equals_interval() -> Result<(), String> {
    let now = Utc
        .with_ymd_and_hms(2024, 1, 15, 10, 47, 13)
        .single()
        .ok_or("Invalid now")?;
    for minutes in [1_i64, 5, 15, 60, 90, 1440] {
        let interval = TimeDelta::minutes(minutes);
        for anchor in [None, Some("202401150930")] {
            let window =
                resolve_window(anchor, interval, &now).map_err(|err| err.to_string())?;
            if window.length() != interval || window.end <= window.start {
                return Err(format!(
                    "Window {:?} does not span {} minute(s) (anchor {:?})",
                    window, minutes, anchor
                ));
            }
        }
    }
    Ok(())
}

#[test]
fn no_anchor_window_ends_at_last_boundary() -> Result<(), String> {
    let now = Utc
        .with_ymd_and_hms(2024, 1, 15, 10, 47, 13)
        .single()
        .ok_or("Invalid now")?;

    let hourly = resolve_window(None, TimeDelta::minutes(60), &now).map_err(|err| err.to_string())?;
    let expected_start = Utc
        .with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .ok_or("Invalid start")?;
    if hourly.start != expected_start {
        return Err(format!("Unexpected hourly start: {}", hourly.start));
    }

    let quarter = resolve_window(None, TimeDelta::minutes(15), &now).map_err(|err| err.to_string())?;
    let expected_start = Utc
        .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
        .single()
        .ok_or("Invalid start")?;
    if quarter.start != expected_start {
        return Err(format!("Unexpected quarter start: {}", quarter.start));
    }

    let again = resolve_window(None, TimeDelta::minutes(15), &now).map_err(|err| err.to_string())?;
    if again != quarter {
        return Err("Expected resolution to be deterministic for a fixed clock".to_owned());
    }
    Ok(())
}

#[test]
fn no_anchor_boundary_uses_local_wall_clock() -> Result<(), String> {
    let india = FixedOffset::east_opt(5 * 3600 + 1800).ok_or("Invalid offset")?;
    let now = india
        .with_ymd_and_hms(2024, 1, 15, 10, 47, 0)
        .single()
        .ok_or("Invalid now")?;
    let window = resolve_window(None, TimeDelta::minutes(60), &now).map_err(|err| err.to_string())?;
    // 09:00 local is 03:30 UTC.
    let expected_start = Utc
        .with_ymd_and_hms(2024, 1, 15, 3, 30, 0)
        .single()
        .ok_or("Invalid start")?;
    if window.start != expected_start {
        return Err(format!("Unexpected start: {}", window.start));
    }
    Ok(())
}

#[test]
fn no_anchor_start_in_spring_forward_gap_moves_past_gap() -> Result<(), String> {
    // New York skips 02:00-03:00 local on 2024-03-10.
    let now = New_York
        .with_ymd_and_hms(2024, 3, 10, 3, 30, 0)
        .single()
        .ok_or("Invalid now")?;
    let window = resolve_window(None, TimeDelta::minutes(60), &now).map_err(|err| err.to_string())?;

    // 03:00 EDT is 07:00 UTC.
    let expected_start = Utc
        .with_ymd_and_hms(2024, 3, 10, 7, 0, 0)
        .single()
        .ok_or("Invalid start")?;
    if window.start != expected_start {
        return Err(format!("Unexpected start: {}", window.start));
    }
    if window.length() != TimeDelta::minutes(60) {
        return Err(format!("Unexpected window length: {:?}", window));
    }
    Ok(())
}

#[test]
fn no_anchor_window_on_ordinary_day_in_dst_zone() -> Result<(), String> {
    let now = New_York
        .with_ymd_and_hms(2024, 7, 1, 10, 47, 0)
        .single()
        .ok_or("Invalid now")?;
    let window = resolve_window(None, TimeDelta::minutes(60), &now).map_err(|err| err.to_string())?;
    // 09:00 EDT is 13:00 UTC.
    let expected_start = Utc
        .with_ymd_and_hms(2024, 7, 1, 13, 0, 0)
        .single()
        .ok_or("Invalid start")?;
    if window.start != expected_start {
        return Err(format!("Unexpected start: {}", window.start));
    }
    Ok(())
}

#[test]
fn anchor_inside_spring_forward_gap_is_rejected() -> Result<(), String> {
    let now = New_York
        .with_ymd_and_hms(2024, 3, 11, 12, 0, 0)
        .single()
        .ok_or("Invalid now")?;
    match resolve_window(Some("202403100230"), TimeDelta::minutes(60), &now) {
        Err(AppError::Parse(ParseError::NonexistentLocalTime { .. })) => Ok(()),
        other => Err(format!("Expected nonexistent local time, got {:?}", other)),
    }
}

#[test]
fn malformed_anchor_is_a_parse_error() -> Result<(), String> {
    let now = Utc::now();
    for anchor in ["2024-01-15", "20240115", "202413150930", "abc"] {
        match resolve_window(Some(anchor), TimeDelta::minutes(60), &now) {
            Err(AppError::Parse(ParseError::InvalidAnchor { value, .. })) if value == anchor => {}
            Err(err) => return Err(format!("Unexpected error for {}: {}", anchor, err)),
            Ok(window) => return Err(format!("Expected {} to fail, got {:?}", anchor, window)),
        }
    }
    Ok(())
}

// --- catalog ----------------------------------------------------------------

#[test]
fn catalog_follows_every_page() -> Result<(), String> {
    run_async_test(async {
        let first = numbered_metrics("CPUUtilization", 50);
        let second = numbered_metrics("NetworkIn", 50);
        let third = numbered_metrics("NetworkOut", 7);
        let expected: Vec<MetricIdentity> = first
            .iter()
            .chain(second.iter())
            .chain(third.iter())
            .cloned()
            .collect();
        let provider = ScriptedProvider::new(
            vec![
                page(first, Some("token-1")),
                page(second, Some("token-2")),
                page(third, None),
            ],
            |_| Ok(GetMetricDataResponse::default()),
        );

        let catalog = MetricCatalogFetcher::new(&provider)
            .fetch(Some("AWS/EC2"), &[])
            .await
            .map_err(|err| err.to_string())?;

        if catalog.len() != 107 {
            return Err(format!("Expected 107 metrics, got {}", catalog.len()));
        }
        if catalog != expected {
            return Err("Catalog is not in page-then-within-page order".to_owned());
        }
        let tokens: Vec<Option<String>> = provider
            .list_calls()
            .into_iter()
            .map(|(_, token)| token)
            .collect();
        let expected_tokens = vec![
            None,
            Some("token-1".to_owned()),
            Some("token-2".to_owned()),
        ];
        if tokens != expected_tokens {
            return Err(format!("Unexpected tokens forwarded: {:?}", tokens));
        }
        Ok(())
    })
}

#[test]
fn catalog_treats_empty_namespace_and_token_as_absent() -> Result<(), String> {
    run_async_test(async {
        let provider = ScriptedProvider::new(
            vec![page(numbered_metrics("Requests", 3), Some(""))],
            |_| Ok(GetMetricDataResponse::default()),
        );
        let catalog = MetricCatalogFetcher::new(&provider)
            .fetch(Some(""), &[])
            .await
            .map_err(|err| err.to_string())?;
        if catalog.len() != 3 {
            return Err(format!("Expected 3 metrics, got {}", catalog.len()));
        }
        let calls = provider.list_calls();
        if calls != vec![(None, None)] {
            return Err(format!("Unexpected list calls: {:?}", calls));
        }
        Ok(())
    })
}

#[test]
fn catalog_failure_discards_earlier_pages() -> Result<(), String> {
    run_async_test(async {
        let provider = ScriptedProvider::new(
            vec![
                page(numbered_metrics("Requests", 2), Some("token-1")),
                Err(AppError::provider(ProviderError::Api {
                    operation: "ListMetrics",
                    status: 400,
                    code: "InvalidParameterValue".to_owned(),
                    message: "bad token".to_owned(),
                })),
            ],
            |_| Ok(GetMetricDataResponse::default()),
        );
        match MetricCatalogFetcher::new(&provider).fetch(None, &[]).await {
            Err(AppError::Provider(ProviderError::Api { status: 400, .. })) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(catalog) => Err(format!("Expected failure, got {} metrics", catalog.len())),
        }
    })
}

// --- batch ------------------------------------------------------------------

#[test]
fn batch_pairs_each_metric_with_each_statistic() -> Result<(), String> {
    let batch = two_metric_batch();
    let pairs: Vec<(&str, StatisticKind)> = batch
        .iter()
        .map(|query| (query.metric.name.as_str(), query.statistic))
        .collect();
    let expected = vec![
        ("CPUUtilization", StatisticKind::Average),
        ("CPUUtilization", StatisticKind::Sum),
        ("NetworkIn", StatisticKind::Average),
        ("NetworkIn", StatisticKind::Sum),
    ];
    if pairs != expected {
        return Err(format!("Unexpected pairs: {:?}", pairs));
    }
    let ids: Vec<&str> = batch.iter().map(|query| query.id.as_str()).collect();
    if ids != vec!["average0", "sum1", "average2", "sum3"] {
        return Err(format!("Unexpected ids: {:?}", ids));
    }
    if batch.iter().any(|query| query.period_seconds != 60) {
        return Err("Expected period to be copied to every query".to_owned());
    }
    Ok(())
}

#[test]
fn batch_ids_are_unique_across_the_batch() -> Result<(), String> {
    let metrics = numbered_metrics("CPUUtilization", 40);
    let statistics = [
        StatisticKind::SampleCount,
        StatisticKind::Average,
        StatisticKind::Sum,
        StatisticKind::Minimum,
        StatisticKind::Maximum,
    ];
    let batch = build_batch(&metrics, &statistics, 60);
    if batch.len() != 200 {
        return Err(format!("Expected 200 queries, got {}", batch.len()));
    }
    let ids: HashSet<&str> = batch.iter().map(|query| query.id.as_str()).collect();
    if ids.len() != batch.len() {
        return Err("Query ids collide".to_owned());
    }
    Ok(())
}

#[test]
fn empty_catalog_builds_empty_batch() -> Result<(), String> {
    let batch = build_batch(&[], &StatisticKind::DEFAULTS, 60);
    if !batch.is_empty() {
        return Err(format!("Expected empty batch, got {}", batch.len()));
    }
    Ok(())
}

// --- correlation ------------------------------------------------------------

#[test]
fn positional_results_follow_submission_order() -> Result<(), String> {
    let batch = two_metric_batch();
    let records = correlate(&batch, echo_results(&batch, false)).map_err(|err| err.to_string())?;
    if records.len() != 4 {
        return Err(format!("Expected 4 records, got {}", records.len()));
    }
    for (position, (query, record)) in batch.iter().zip(&records).enumerate() {
        let value = record.datapoints.first().map(|point| point.value);
        if record.metric != query.metric
            || record.statistic != query.statistic
            || value != Some(position as f64)
        {
            return Err(format!("Record {} mis-correlated: {:?}", position, record));
        }
    }
    Ok(())
}

#[test]
fn echoed_ids_survive_reordering() -> Result<(), String> {
    let batch = two_metric_batch();
    let mut results = echo_results(&batch, true);
    results.reverse();
    let records = correlate(&batch, results).map_err(|err| err.to_string())?;
    for (position, (query, record)) in batch.iter().zip(&records).enumerate() {
        let value = record.datapoints.first().map(|point| point.value);
        if record.metric != query.metric
            || record.statistic != query.statistic
            || value != Some(position as f64)
        {
            return Err(format!("Record {} mis-correlated: {:?}", position, record));
        }
    }
    Ok(())
}

#[test]
fn correlation_rejects_inconsistent_responses() -> Result<(), String> {
    let batch = two_metric_batch();

    let mut short = echo_results(&batch, false);
    short.pop();
    match correlate(&batch, short) {
        Err(AppError::Provider(ProviderError::ResultCountMismatch {
            expected: 4,
            actual: 3,
        })) => {}
        other => return Err(format!("Expected count mismatch, got {:?}", other.err())),
    }

    let mut unknown = echo_results(&batch, true);
    if let Some(first) = unknown.first_mut() {
        first.id = Some("maximum99".to_owned());
    }
    match correlate(&batch, unknown) {
        Err(AppError::Provider(ProviderError::UnknownResultId { id })) if id == "maximum99" => {}
        other => return Err(format!("Expected unknown id, got {:?}", other.err())),
    }

    let mut duplicate = echo_results(&batch, true);
    if let Some(last) = duplicate.last_mut() {
        last.id = Some("average0".to_owned());
    }
    match correlate(&batch, duplicate) {
        Err(AppError::Provider(ProviderError::DuplicateResultId { id })) if id == "average0" => {}
        other => return Err(format!("Expected duplicate id, got {:?}", other.err())),
    }

    let mut missing = echo_results(&batch, true);
    missing.pop();
    match correlate(&batch, missing) {
        Err(AppError::Provider(ProviderError::MissingResult { id })) if id == "sum3" => {}
        other => return Err(format!("Expected missing result, got {:?}", other.err())),
    }

    let mut mixed = echo_results(&batch, true);
    if let Some(first) = mixed.first_mut() {
        first.id = None;
    }
    match correlate(&batch, mixed) {
        Err(AppError::Provider(ProviderError::MixedCorrelation)) => Ok(()),
        other => Err(format!("Expected mixed correlation, got {:?}", other.err())),
    }
}

#[test]
fn failed_query_fails_the_batch() -> Result<(), String> {
    let batch = two_metric_batch();
    let mut results = echo_results(&batch, true);
    if let Some(second) = results.get_mut(1) {
        second.status = ResultStatus::Forbidden;
        second.messages = vec!["Forbidden: not authorized".to_owned()];
    }
    match correlate(&batch, results) {
        Err(AppError::Provider(ProviderError::QueryFailed { id, status, message }))
            if id == "sum1"
                && status == ResultStatus::Forbidden
                && message == "Forbidden: not authorized" =>
        {
            Ok(())
        }
        other => Err(format!("Expected query failure, got {:?}", other.err())),
    }
}

#[test]
fn partial_data_is_passed_through() -> Result<(), String> {
    let batch = two_metric_batch();
    let mut results = echo_results(&batch, true);
    if let Some(first) = results.first_mut() {
        first.status = ResultStatus::PartialData;
    }
    let records = correlate(&batch, results).map_err(|err| err.to_string())?;
    if records.len() != 4 {
        return Err(format!("Expected 4 records, got {}", records.len()));
    }
    Ok(())
}

#[test]
fn mismatched_datapoint_lengths_are_rejected() -> Result<(), String> {
    let batch = two_metric_batch();
    let mut results = echo_results(&batch, true);
    if let Some(first) = results.first_mut() {
        first.values.push(1.0);
    }
    match correlate(&batch, results) {
        Err(AppError::Provider(ProviderError::MalformedResult {
            timestamps: 1,
            values: 2,
            ..
        })) => Ok(()),
        other => Err(format!("Expected malformed result, got {:?}", other.err())),
    }
}

// --- pipeline ---------------------------------------------------------------

#[test]
fn plan_and_execute_correlate_every_query() -> Result<(), String> {
    run_async_test(async {
        let provider = ScriptedProvider::new(
            vec![page(
                vec![metric("CPUUtilization", "i-1"), metric("NetworkIn", "i-2")],
                None,
            )],
            |queries: &[QueryDescriptor]| {
                Ok(GetMetricDataResponse {
                    results: echo_results(queries, true),
                })
            },
        );
        let config = run_config(StatisticKind::DEFAULTS.to_vec())?;
        let window = window()?;

        let plan = plan(&provider, &config, window)
            .await
            .map_err(|err| err.to_string())?;
        if plan.batch.len() != 4 || plan.period_seconds != 300 {
            return Err(format!("Unexpected plan: {:?}", plan));
        }
        let snapshot = execute(&provider, &plan)
            .await
            .map_err(|err| err.to_string())?;

        if snapshot.window != window || snapshot.results.len() != 4 {
            return Err(format!("Unexpected snapshot: {:?}", snapshot));
        }
        for (query, record) in plan.batch.iter().zip(&snapshot.results) {
            if record.metric != query.metric || record.statistic != query.statistic {
                return Err(format!("Mis-correlated record: {:?}", record));
            }
        }
        let calls = provider.list_calls();
        if calls != vec![(Some("AWS/EC2".to_owned()), None)] {
            return Err(format!("Unexpected list calls: {:?}", calls));
        }
        if provider.data_calls() != 1 {
            return Err(format!("Expected one data call, got {}", provider.data_calls()));
        }
        Ok(())
    })
}

#[test]
fn empty_catalog_skips_the_query_call() -> Result<(), String> {
    run_async_test(async {
        let provider = ScriptedProvider::new(
            vec![page(Vec::new(), None)],
            |_| Err(AppError::provider(ProviderError::MixedCorrelation)),
        );
        let config = run_config(StatisticKind::DEFAULTS.to_vec())?;
        let plan = plan(&provider, &config, window()?)
            .await
            .map_err(|err| err.to_string())?;
        let snapshot = execute(&provider, &plan)
            .await
            .map_err(|err| err.to_string())?;
        if !plan.batch.is_empty() || !snapshot.results.is_empty() {
            return Err("Expected empty batch and results".to_owned());
        }
        if provider.data_calls() != 0 {
            return Err("Expected no data call for an empty catalog".to_owned());
        }
        Ok(())
    })
}

#[test]
fn failures_name_the_phase() -> Result<(), String> {
    run_async_test(async {
        let config = run_config(vec![StatisticKind::Maximum])?;

        let discovery = ScriptedProvider::new(
            vec![Err(AppError::provider(ProviderError::Api {
                operation: "ListMetrics",
                status: 403,
                code: "AccessDenied".to_owned(),
                message: "no".to_owned(),
            }))],
            |_| Ok(GetMetricDataResponse::default()),
        );
        match plan(&discovery, &config, window()?).await {
            Err(err) if err.phase() == Some(Phase::Discovery) => {}
            Err(err) => return Err(format!("Expected discovery phase, got {}", err)),
            Ok(_) => return Err("Expected discovery failure".to_owned()),
        }

        let query = ScriptedProvider::new(
            vec![page(vec![metric("CPUUtilization", "i-1")], None)],
            |_| Ok(GetMetricDataResponse::default()),
        );
        let plan = plan(&query, &config, window()?)
            .await
            .map_err(|err| err.to_string())?;
        match execute(&query, &plan).await {
            Err(err) if err.phase() == Some(Phase::Query) => {
                if !err.to_string().starts_with("query execution failed") {
                    return Err(format!("Unexpected message: {}", err));
                }
                Ok(())
            }
            Err(err) => Err(format!("Expected query phase, got {}", err)),
            Ok(_) => Err("Expected query failure".to_owned()),
        }
    })
}
