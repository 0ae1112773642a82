use campus_housing::presentation::ListingMapView;
use campus_housing::search::SearchService;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) search: SearchService,
    pub(crate) map_view: Arc<dyn ListingMapView>,
    pub(crate) runtime: RuntimeInfo,
}

/// Process facts reported by the health endpoint.
#[derive(Debug, Clone)]
pub(crate) struct RuntimeInfo {
    pub(crate) environment: &'static str,
    pub(crate) version: String,
    pub(crate) started_at: Instant,
}

impl RuntimeInfo {
    pub(crate) fn new(environment: &'static str, version: impl Into<String>) -> Self {
        Self {
            environment,
            version: version.into(),
            started_at: Instant::now(),
        }
    }
}

const DEGRADED_MESSAGE: &str = "Application is running but some metrics are unavailable";

/// Health payload; a failed memory probe degrades the body, not the status.
pub(crate) fn health_report(runtime: &RuntimeInfo, memory_mb: io::Result<f64>) -> Value {
    let timestamp = Utc::now().to_rfc3339();
    match memory_mb {
        Ok(memory_usage) => json!({
            "status": "healthy",
            "timestamp": timestamp,
            "uptime": runtime.started_at.elapsed().as_secs_f64(),
            "environment": runtime.environment,
            "version": runtime.version,
            "memoryUsage": memory_usage,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "health metrics unavailable");
            json!({
                "status": "degraded",
                "timestamp": timestamp,
                "message": DEGRADED_MESSAGE,
            })
        }
    }
}

/// Resident set size of this process in megabytes.
pub(crate) fn resident_memory_mb() -> io::Result<f64> {
    let status = std::fs::read_to_string("/proc/self/status")?;
    parse_vm_rss_mb(&status)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "VmRSS not reported"))
}

fn parse_vm_rss_mb(status: &str) -> Option<f64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kilobytes: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kilobytes / 1024.0)
}
