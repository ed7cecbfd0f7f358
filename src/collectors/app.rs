//! Application Metrics Collector
//!
//! # Metrics Produced
//! - `truenas_app_state` - App state (1=RUNNING, 0.5=DEPLOYING, 0=STOPPED, -1=CRASHED)
//!   - Labels: host, app
//! - `truenas_app_info` - Always 1
//!   - Labels: host, app, version, train

use super::{records, state, TargetSnapshot};
use crate::metrics::{Labels, MetricFamily};

pub fn collect(snapshots: &[TargetSnapshot]) -> Vec<MetricFamily> {
    let mut app_state = MetricFamily::gauge(
        "app_state",
        "App state (1=RUNNING, 0.5=DEPLOYING, 0=STOPPED, -1=CRASHED)",
    );
    let mut info = MetricFamily::gauge("app_info", "App metadata");

    for snapshot in snapshots {
        let Some(apps) = records(&snapshot.apps) else {
            continue;
        };

        for app in apps {
            let labels = Labels::new()
                .with("host", &snapshot.host)
                .with("app", app.name());

            app_state.push(labels.clone(), state::app(app.state()));
            info.push(
                labels
                    .with("version", app.version())
                    .with("train", app.train()),
                1.0,
            );
        }
    }

    vec![app_state, info]
}
