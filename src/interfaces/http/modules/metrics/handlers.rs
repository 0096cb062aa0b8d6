use axum::{extract::State, http::header, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::SharedWorkbenchRegistry;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub workbenches: SharedWorkbenchRegistry,
}

/// `GET /metrics`, unauthenticated
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    metrics::gauge!("workbenches_mounted").set(state.workbenches.count() as f64);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
