//! Metrics Collectors
//!
//! A scrape runs in two phases:
//!
//! 1. [`scrape`] fans out over all targets concurrently. Each target fetches its
//!    five endpoints in sequence and yields a [`TargetSnapshot`] holding the
//!    typed records or the error for every endpoint.
//! 2. [`collect_all`] hands the snapshots to the per-domain normalizers, which are
//!    pure functions returning [`MetricFamily`] values.
//!
//! # Error Handling
//!
//! Endpoint failures are non-fatal: they are logged and stored in the snapshot.
//! A failed endpoint contributes no samples for that host (replication reports
//! `truenas_replication_up 0` instead), and never affects other hosts or endpoints.

use crate::error::ExporterError;
use crate::metrics::{Labels, MetricFamily};
use crate::truenas::types::{App, Pool, ReplicationTask, VirtInstance, Vm};
use crate::truenas::{Endpoint, TrueNasClient};
use futures_util::future::join_all;
use std::future::Future;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn, Level};

pub mod app;
pub mod pool;
pub mod replication;
pub mod schedule;
pub mod state;
pub mod virt;
pub mod vm;

/// Outcome of one endpoint fetch for one target.
pub type FetchResult<T> = Result<T, ExporterError>;

/// Everything fetched from one target during one scrape.
#[derive(Debug)]
pub struct TargetSnapshot {
    pub host: String,
    pub replication: FetchResult<Vec<ReplicationTask>>,
    pub pools: FetchResult<Vec<Pool>>,
    pub apps: FetchResult<Vec<App>>,
    pub vms: FetchResult<Vec<Vm>>,
    pub virt_instances: FetchResult<Vec<VirtInstance>>,
    pub duration: Duration,
}

impl TargetSnapshot {
    /// Whether each endpoint answered, in fetch order.
    pub fn endpoint_status(&self) -> [(Endpoint, bool); 5] {
        [
            (Endpoint::Replication, self.replication.is_ok()),
            (Endpoint::Pool, self.pools.is_ok()),
            (Endpoint::App, self.apps.is_ok()),
            (Endpoint::Vm, self.vms.is_ok()),
            (Endpoint::VirtInstance, self.virt_instances.is_ok()),
        ]
    }
}

/// Awaits an API query and logs a failure at `level` without consuming it.
pub async fn query_with_logging<T, F>(
    host: &str,
    endpoint: Endpoint,
    level: Level,
    query_future: F,
) -> FetchResult<Vec<T>>
where
    F: Future<Output = FetchResult<Vec<T>>>,
{
    let result = query_future.await;
    match &result {
        Ok(records) => debug!("Fetched {} {} records from {}", records.len(), endpoint, host),
        Err(e) if level == Level::WARN => {
            warn!("Failed to fetch {} from {}: {}", endpoint, host, e)
        }
        Err(e) => debug!("Failed to fetch {} from {}: {}", endpoint, host, e),
    }
    result
}

/// Fetches all five endpoints of one target, one after another.
pub async fn snapshot_target(client: &TrueNasClient) -> TargetSnapshot {
    let host = client.name();
    let started = Instant::now();

    let replication = query_with_logging(
        host,
        Endpoint::Replication,
        Level::WARN,
        client.query_replication_tasks(),
    )
    .await;
    let pools = query_with_logging(host, Endpoint::Pool, Level::WARN, client.query_pools()).await;
    let apps = query_with_logging(host, Endpoint::App, Level::WARN, client.query_apps()).await;
    let vms = query_with_logging(host, Endpoint::Vm, Level::WARN, client.query_vms()).await;
    // Older TrueNAS releases have no virt API at all
    let virt_instances = query_with_logging(
        host,
        Endpoint::VirtInstance,
        Level::DEBUG,
        client.query_virt_instances(),
    )
    .await;

    TargetSnapshot {
        host: host.to_string(),
        replication,
        pools,
        apps,
        vms,
        virt_instances,
        duration: started.elapsed(),
    }
}

/// Fetches every target concurrently. Snapshots come back in target order.
pub async fn scrape(clients: &[TrueNasClient]) -> Vec<TargetSnapshot> {
    join_all(clients.iter().map(snapshot_target)).await
}

/// Runs every normalizer over the snapshots. `now` is epoch seconds.
pub fn collect_all(snapshots: &[TargetSnapshot], now: f64) -> Vec<MetricFamily> {
    let mut families = Vec::new();
    families.extend(replication::collect(snapshots, now));
    families.extend(pool::collect(snapshots));
    families.extend(app::collect(snapshots));
    families.extend(vm::collect(snapshots));
    families.extend(virt::collect(snapshots));
    families.extend(collect_scrape_metrics(snapshots));
    families
}

/// Per-target exporter bookkeeping: fetch time and endpoint reachability.
pub fn collect_scrape_metrics(snapshots: &[TargetSnapshot]) -> Vec<MetricFamily> {
    let mut duration = MetricFamily::gauge(
        "scrape_duration_seconds",
        "Time spent fetching all endpoints of a TrueNAS host",
    );
    let mut endpoint_up = MetricFamily::gauge(
        "scrape_endpoint_up",
        "1 if the TrueNAS API endpoint answered during this scrape",
    );

    for snapshot in snapshots {
        duration.push(
            Labels::new().with("host", &snapshot.host),
            snapshot.duration.as_secs_f64(),
        );
        for (endpoint, ok) in snapshot.endpoint_status() {
            endpoint_up.push(
                Labels::new()
                    .with("host", &snapshot.host)
                    .with("endpoint", endpoint),
                if ok { 1.0 } else { 0.0 },
            );
        }
    }

    vec![duration, endpoint_up]
}

/// Current wall-clock time as epoch seconds.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Records of a successful fetch; `None` when the endpoint failed.
pub(crate) fn records<T>(result: &FetchResult<Vec<T>>) -> Option<&[T]> {
    result.as_ref().ok().map(Vec::as_slice)
}
