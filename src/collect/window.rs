use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};

use crate::domain::TimeWindow;
use crate::error::{AppError, AppResult, ParseError};

/// Format of the `--time` anchor, in local time.
pub const ANCHOR_FORMAT: &str = "%Y%m%d%H%M";

/// Longest local-time gap ever observed (a skipped calendar day).
const MAX_GAP_MINUTES: u32 = 24 * 60;

/// Resolves the collection window.
///
/// With an anchor the window starts at the anchor. Without one it ends at the
/// most recent `interval` boundary of `now`'s wall clock and starts one
/// interval earlier. Local times are interpreted in `now`'s time zone; the
/// returned window is in UTC. A computed start that falls into a skipped
/// local hour moves forward to the first instant that exists.
///
/// # Errors
///
/// Returns a parse error when the anchor is malformed or does not exist in
/// the local time zone, or when the window leaves the representable range.
pub fn resolve_window<Tz>(
    anchor: Option<&str>,
    interval: TimeDelta,
    now: &DateTime<Tz>,
) -> AppResult<TimeWindow>
where
    Tz: TimeZone,
{
    let zone = now.timezone();
    let start = match anchor {
        Some(value) => {
            let naive = NaiveDateTime::parse_from_str(value.trim(), ANCHOR_FORMAT).map_err(|err| {
                AppError::parse(ParseError::InvalidAnchor {
                    value: value.to_owned(),
                    source: err,
                })
            })?;
            localize(&zone, naive)?
        }
        None => {
            let boundary = floor_to_interval(now.naive_local(), interval)?;
            let start = boundary
                .checked_sub_signed(interval)
                .ok_or_else(|| AppError::parse(ParseError::WindowOverflow))?;
            localize_forward(&zone, start)?
        }
    };

    let start = start.with_timezone(&Utc);
    let end = start
        .checked_add_signed(interval)
        .ok_or_else(|| AppError::parse(ParseError::WindowOverflow))?;
    Ok(TimeWindow { start, end })
}

/// Drops `naive mod interval`, measured on the wall clock.
fn floor_to_interval(naive: NaiveDateTime, interval: TimeDelta) -> AppResult<NaiveDateTime> {
    let seconds = naive.and_utc().timestamp();
    let remainder = seconds
        .checked_rem_euclid(interval.num_seconds())
        .ok_or_else(|| AppError::parse(ParseError::WindowOverflow))?;
    let floored = seconds
        .checked_sub(remainder)
        .ok_or_else(|| AppError::parse(ParseError::WindowOverflow))?;
    DateTime::from_timestamp(floored, 0)
        .map(|value| value.naive_utc())
        .ok_or_else(|| AppError::parse(ParseError::WindowOverflow))
}

fn localize<Tz>(zone: &Tz, naive: NaiveDateTime) -> AppResult<DateTime<Tz>>
where
    Tz: TimeZone,
{
    zone.from_local_datetime(&naive).earliest().ok_or_else(|| {
        AppError::parse(ParseError::NonexistentLocalTime {
            value: naive.format(ANCHOR_FORMAT).to_string(),
        })
    })
}

/// Like [`localize`], but a wall-clock time inside a DST gap resolves to the
/// first minute after the gap.
fn localize_forward<Tz>(zone: &Tz, naive: NaiveDateTime) -> AppResult<DateTime<Tz>>
where
    Tz: TimeZone,
{
    let mut candidate = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        if let Some(resolved) = zone.from_local_datetime(&candidate).earliest() {
            return Ok(resolved);
        }
        candidate = candidate
            .checked_add_signed(TimeDelta::minutes(1))
            .ok_or_else(|| AppError::parse(ParseError::WindowOverflow))?;
    }
    localize(zone, naive)
}
