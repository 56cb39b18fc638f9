//! Prometheus metrics handler
//!
//! Exposes `GET /metrics` returning Prometheus text format.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics`: Prometheus scrape endpoint (no auth)
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[tokio::test]
    async fn renders_prometheus_text() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let response = prometheus_metrics(State(MetricsState { handle }))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(to_bytes(response.into_body(), usize::MAX).await.is_ok());
    }
}
