//! Metrics collection and exposition.
//!
//! # Metrics
//! - `light_node_work_invocations_total` (counter): unit-of-work runs by worker
//! - `light_node_work_failures_total` (counter): failed runs by worker
//! - `light_node_active_workers` (gauge): workers currently alive, see [`ActiveWorkerGuard`]

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const WORK_INVOCATIONS: &str = "light_node_work_invocations_total";
pub const WORK_FAILURES: &str = "light_node_work_failures_total";
pub const ACTIVE_WORKERS: &str = "light_node_active_workers";

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one invocation of the unit of work.
pub fn record_invocation(worker_id: u32, success: bool) {
    let worker = worker_id.to_string();
    metrics::counter!(WORK_INVOCATIONS, "worker" => worker.clone()).increment(1);
    if !success {
        metrics::counter!(WORK_FAILURES, "worker" => worker).increment(1);
    }
}

/// Counts a worker in `light_node_active_workers` for as long as it lives.
///
/// The decrement runs on drop, so a worker whose task unwinds from a panic
/// is still removed from the gauge.
#[must_use = "the worker is only counted while the guard is alive"]
pub struct ActiveWorkerGuard(());

impl ActiveWorkerGuard {
    pub fn enter() -> Self {
        metrics::gauge!(ACTIVE_WORKERS).increment(1.0);
        Self(())
    }
}

impl Drop for ActiveWorkerGuard {
    fn drop(&mut self) {
        metrics::gauge!(ACTIVE_WORKERS).decrement(1.0);
    }
}
