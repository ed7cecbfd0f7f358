//! Upstream state strings mapped onto gauge values.
//!
//! Lookups are case-insensitive. Anything outside the known set maps to
//! [`UNKNOWN_STATE`] so the sample is still emitted.

/// Value for unknown, error, or crashed states.
pub const UNKNOWN_STATE: f64 = -1.0;

/// FINISHED/SUCCESS = 1, RUNNING = 0.5, PENDING/WAITING = 0, otherwise -1
pub fn replication(state: &str) -> f64 {
    match state.to_uppercase().as_str() {
        "FINISHED" | "SUCCESS" => 1.0,
        "RUNNING" => 0.5,
        "PENDING" | "WAITING" => 0.0,
        _ => UNKNOWN_STATE,
    }
}

/// RUNNING/ACTIVE = 1, DEPLOYING = 0.5, STOPPED = 0, otherwise -1
pub fn app(state: &str) -> f64 {
    match state.to_uppercase().as_str() {
        "RUNNING" | "ACTIVE" => 1.0,
        "DEPLOYING" => 0.5,
        "STOPPED" => 0.0,
        _ => UNKNOWN_STATE,
    }
}

/// RUNNING = 1, STOPPED = 0, otherwise -1
pub fn vm(state: &str) -> f64 {
    match state.to_uppercase().as_str() {
        "RUNNING" => 1.0,
        "STOPPED" => 0.0,
        _ => UNKNOWN_STATE,
    }
}

/// RUNNING = 1, STOPPED/FROZEN = 0, otherwise -1
pub fn virt(state: &str) -> f64 {
    match state.to_uppercase().as_str() {
        "RUNNING" => 1.0,
        "STOPPED" | "FROZEN" => 0.0,
        _ => UNKNOWN_STATE,
    }
}
