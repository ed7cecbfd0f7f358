//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::time::Duration;
use truenas_health_exporter::collectors::TargetSnapshot;
use truenas_health_exporter::metrics::MetricFamily;

/// Snapshot with every endpoint returning an empty list.
pub fn empty_snapshot(host: &str) -> TargetSnapshot {
    TargetSnapshot {
        host: host.to_string(),
        replication: Ok(Vec::new()),
        pools: Ok(Vec::new()),
        apps: Ok(Vec::new()),
        vms: Ok(Vec::new()),
        virt_instances: Ok(Vec::new()),
        duration: Duration::ZERO,
    }
}

pub fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
    families
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("missing family {}", name))
}

pub trait SampleLookup {
    /// Value of the first sample whose labels contain every given pair.
    fn value_where(&self, matchers: &[(&str, &str)]) -> Option<f64>;
}

impl SampleLookup for MetricFamily {
    fn value_where(&self, matchers: &[(&str, &str)]) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| matchers.iter().all(|(k, v)| s.labels.get(k) == Some(*v)))
            .map(|s| s.value)
    }
}
