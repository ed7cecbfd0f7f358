//! Replication Metrics Collector
//!
//! # Metrics Produced
//! - `truenas_replication_up` - 1 if the replication endpoint answered, else 0
//!   - Labels: host
//! - `truenas_replication_state` - Task state (1=FINISHED, 0.5=RUNNING, 0=PENDING, -1=ERROR)
//! - `truenas_replication_last_run_timestamp` - Epoch seconds of the last run, 0 if never run
//! - `truenas_replication_age_seconds` - Seconds since the last run, -1 if never run
//! - `truenas_replication_expected_interval_seconds` - Expected cadence from the schedules
//!   - Labels (all four): host, task_name, task_id
//! - `truenas_replication_info` - Always 1
//!   - Labels: host, task_name, task_id, direction, transport, source, target,
//!     last_snapshot, schedule
//!
//! Disabled tasks produce no samples.

use super::{records, schedule, state, TargetSnapshot};
use crate::metrics::{Labels, MetricFamily};

pub fn collect(snapshots: &[TargetSnapshot], now: f64) -> Vec<MetricFamily> {
    let mut up = MetricFamily::gauge("replication_up", "1 if TrueNAS API is reachable");
    let mut task_state = MetricFamily::gauge(
        "replication_state",
        "Replication task state (1=FINISHED, 0.5=RUNNING, 0=PENDING, -1=ERROR)",
    );
    let mut last_run = MetricFamily::gauge(
        "replication_last_run_timestamp",
        "Unix timestamp of last replication run",
    );
    let mut age = MetricFamily::gauge(
        "replication_age_seconds",
        "Seconds since last replication run",
    );
    let mut expected = MetricFamily::gauge(
        "replication_expected_interval_seconds",
        "Expected interval between replications based on schedule",
    );
    let mut info = MetricFamily::gauge("replication_info", "Replication task metadata");

    for snapshot in snapshots {
        let host = snapshot.host.as_str();
        let Some(tasks) = records(&snapshot.replication) else {
            up.push(Labels::new().with("host", host), 0.0);
            continue;
        };
        up.push(Labels::new().with("host", host), 1.0);

        for task in tasks.iter().filter(|t| t.enabled()) {
            let labels = Labels::new()
                .with("host", host)
                .with("task_name", task.name())
                .with("task_id", task.id());

            let last_run_ts = task.last_run_timestamp();
            let age_seconds = if last_run_ts > 0.0 {
                now - last_run_ts
            } else {
                -1.0
            };
            let (interval, source_schedule) = schedule::expected_interval(task);

            task_state.push(labels.clone(), state::replication(task.state()));
            last_run.push(labels.clone(), last_run_ts);
            age.push(labels.clone(), age_seconds);
            expected.push(labels.clone(), interval as f64);

            let info_labels = labels
                .with("direction", task.direction())
                .with("transport", task.transport())
                .with("source", task.source())
                .with("target", task.target_dataset())
                .with("last_snapshot", task.last_snapshot())
                .with_opt("schedule", source_schedule.map(|s| s.to_cron()));
            info.push(info_labels, 1.0);
        }
    }

    vec![up, task_state, last_run, age, expected, info]
}
