//! Expected-interval inference from cron-like schedules.
//!
//! This is a staleness heuristic, not a cron evaluator. Rules, first match wins:
//!
//! | minute | hour  | dom | dow   | interval        |
//! |--------|-------|-----|-------|-----------------|
//! | `*/N`  |       |     |       | N × 60          |
//! | fixed  | `*/N` |     |       | N × 3600        |
//! | fixed  | `*`   | `*` |       | 3600 (hourly)   |
//! |        | fixed | `*` | `*`   | 86400 (daily)   |
//! |        |       |     | fixed | 604800 (weekly) |
//! | other  |       |     |       | 86400           |
//!
//! Comma lists and day-of-month schedules fall through to the daily default.

use crate::truenas::types::{ReplicationTask, Schedule};

pub const HOURLY: u64 = 3_600;
pub const DAILY: u64 = 86_400;
pub const WEEKLY: u64 = 604_800;

/// Parses `*/N` with N > 0.
fn step(field: &str) -> Option<u64> {
    field
        .strip_prefix("*/")
        .and_then(|n| n.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
}

/// Interval in seconds implied by `schedule`, `None` for an empty schedule or a
/// malformed step.
pub fn interval_seconds(schedule: &Schedule) -> Option<u64> {
    if schedule.is_empty() {
        return None;
    }

    let (minute, hour, dom, dow) = (
        schedule.minute(),
        schedule.hour(),
        schedule.dom(),
        schedule.dow(),
    );

    if minute.starts_with("*/") {
        if let Some(n) = step(minute) {
            return Some(n * 60);
        }
    }

    if minute != "*" {
        if let Some(n) = step(hour) {
            return Some(n * HOURLY);
        }
        if hour == "*" && dom == "*" {
            return Some(HOURLY);
        }
    }

    if hour != "*" && dom == "*" && dow == "*" {
        return Some(DAILY);
    }

    if dow != "*" {
        return Some(WEEKLY);
    }

    Some(DAILY)
}

/// Expected interval of a replication task plus the schedule it came from.
///
/// Takes the tightest cadence among the periodic snapshot tasks feeding the
/// replication, falls back to the task's own schedule, then to one day (with no
/// source schedule).
pub fn expected_interval(task: &ReplicationTask) -> (u64, Option<&Schedule>) {
    let tightest = task
        .periodic_snapshot_tasks()
        .iter()
        .filter_map(|pt| pt.schedule.as_ref())
        .filter_map(|s| interval_seconds(s).map(|secs| (secs, s)))
        .min_by_key(|(secs, _)| *secs);

    if let Some((secs, schedule)) = tightest {
        return (secs, Some(schedule));
    }

    if let Some(schedule) = task.schedule.as_ref() {
        if let Some(secs) = interval_seconds(schedule) {
            return (secs, Some(schedule));
        }
    }

    (DAILY, None)
}
