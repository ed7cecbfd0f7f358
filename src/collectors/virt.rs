//! Incus Instance Metrics Collector (TrueNAS 25.04+)
//!
//! # Metrics Produced
//! - `truenas_virt_state` - Instance state (1=RUNNING, 0=STOPPED/FROZEN, -1=ERROR)
//!   - Labels: host, instance, instance_id, type
//! - `truenas_virt_info` - Always 1
//!   - Labels: host, instance, instance_id, type, cpu, memory_mb, autostart

use super::{records, state, TargetSnapshot};
use crate::metrics::{Labels, MetricFamily};

pub fn collect(snapshots: &[TargetSnapshot]) -> Vec<MetricFamily> {
    let mut virt_state = MetricFamily::gauge(
        "virt_state",
        "Incus instance state (1=RUNNING, 0=STOPPED, -1=ERROR)",
    );
    let mut info = MetricFamily::gauge("virt_info", "Incus instance metadata");

    for snapshot in snapshots {
        let Some(instances) = records(&snapshot.virt_instances) else {
            continue;
        };

        for instance in instances {
            let labels = Labels::new()
                .with("host", &snapshot.host)
                .with("instance", instance.name())
                .with("instance_id", instance.id())
                .with("type", instance.instance_type());

            virt_state.push(labels.clone(), state::virt(instance.status()));
            info.push(
                labels
                    .with("cpu", instance.cpu())
                    .with("memory_mb", instance.memory_mb())
                    .with("autostart", instance.autostart()),
                1.0,
            );
        }
    }

    vec![virt_state, info]
}
