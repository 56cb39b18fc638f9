//! Prometheus metrics endpoint and HTTP metrics middleware

pub mod handlers;
pub mod middleware;

use std::sync::Mutex;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

pub use handlers::*;
pub use middleware::http_metrics_middleware;

static PROMETHEUS: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Install the global Prometheus recorder, or reuse the one already installed.
///
/// The global recorder can only be set once per process; a server restarted
/// inside the same process keeps rendering from the first one.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let mut slot = PROMETHEUS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    *slot = Some(handle.clone());
    Ok(handle)
}
