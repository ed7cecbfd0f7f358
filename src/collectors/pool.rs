//! Pool Metrics Collector
//!
//! Collects ZFS pool capacity.
//!
//! # Metrics Produced
//! - `truenas_pool_size_bytes` - Total size of the pool
//! - `truenas_pool_allocated_bytes` - Allocated bytes in the pool
//! - `truenas_pool_free_bytes` - Free bytes in the pool
//! - `truenas_pool_free_percent` - free / size × 100, two decimals
//!   - Labels (all): host, pool
//!
//! Byte gauges are only emitted for values the API reported. Free percent
//! needs both size and free, and a non-zero size.

use super::{records, TargetSnapshot};
use crate::metrics::{Labels, MetricFamily};

pub fn collect(snapshots: &[TargetSnapshot]) -> Vec<MetricFamily> {
    let mut size = MetricFamily::gauge("pool_size_bytes", "Pool size in bytes");
    let mut allocated = MetricFamily::gauge("pool_allocated_bytes", "Allocated bytes in pool");
    let mut free = MetricFamily::gauge("pool_free_bytes", "Free bytes in pool");
    let mut free_percent =
        MetricFamily::gauge("pool_free_percent", "Free percent in pool").with_decimals(2);

    for snapshot in snapshots {
        let Some(pools) = records(&snapshot.pools) else {
            continue;
        };

        for pool in pools {
            let labels = Labels::new()
                .with("host", &snapshot.host)
                .with("pool", pool.name());

            if let Some(bytes) = pool.size {
                size.push(labels.clone(), bytes);
            }
            if let Some(bytes) = pool.allocated {
                allocated.push(labels.clone(), bytes);
            }
            if let Some(bytes) = pool.free {
                free.push(labels.clone(), bytes);
            }
            if let Some(percent) = pool.free_percent() {
                free_percent.push(labels, percent);
            }
        }
    }

    vec![size, allocated, free, free_percent]
}
