//! Virtual Machine Metrics Collector
//!
//! # Metrics Produced
//! - `truenas_vm_state` - VM state (1=RUNNING, 0=STOPPED, -1=ERROR)
//!   - Labels: host, vm, vm_id
//! - `truenas_vm_info` - Always 1
//!   - Labels: host, vm, vm_id, vcpus, memory_mb, autostart

use super::{records, state, TargetSnapshot};
use crate::metrics::{Labels, MetricFamily};

pub fn collect(snapshots: &[TargetSnapshot]) -> Vec<MetricFamily> {
    let mut vm_state = MetricFamily::gauge("vm_state", "VM state (1=RUNNING, 0=STOPPED, -1=ERROR)");
    let mut info = MetricFamily::gauge("vm_info", "VM metadata");

    for snapshot in snapshots {
        let Some(vms) = records(&snapshot.vms) else {
            continue;
        };

        for vm in vms {
            let labels = Labels::new()
                .with("host", &snapshot.host)
                .with("vm", vm.name())
                .with("vm_id", vm.id());

            vm_state.push(labels.clone(), state::vm(vm.state()));
            info.push(
                labels
                    .with("vcpus", vm.vcpus())
                    .with("memory_mb", vm.memory_mb())
                    .with("autostart", vm.autostart()),
                1.0,
            );
        }
    }

    vec![vm_state, info]
}
