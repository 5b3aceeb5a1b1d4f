//! Operational HTTP endpoints.
//!
//! - `/healthz`       : liveness
//! - `/health`        : aggregated check status
//! - `/metrics`       : text exposition format
//! - `/metrics/:name` : one metric as JSON

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use vitals_core::error::VitalsError;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::health::{ComponentHealth, Status};
use crate::obs::MetricKind;

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<BTreeMap<String, ComponentHealth>>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    let report = state.health().report();
    let components = state.cfg().health.show_details.then_some(report.components);
    Json(HealthBody { status: report.status, components })
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let registry = state.metrics();
    if let Err(e) = state.system().refresh(&registry) {
        tracing::warn!(error = %e, "system metrics refresh failed");
    }

    let filter = state.filter();
    let mut body = String::new();
    for line in registry.render().filter(|l| filter.allows_line(l)) {
        body.push_str(&line);
        body.push('\n');
    }

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        body,
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct Measurement {
    pub tags: BTreeMap<String, String>,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct MetricDetail {
    pub name: String,
    pub kind: MetricKind,
    pub measurements: Vec<Measurement>,
}

pub async fn metric_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MetricDetail>, ApiError> {
    if !state.filter().allows(&name) {
        return Err(VitalsError::NotFound(format!("metric {name}")).into());
    }
    let registry = state.metrics();
    if let Err(e) = state.system().refresh(&registry) {
        tracing::warn!(error = %e, "system metrics refresh failed");
    }

    let samples = registry.snapshot(&name);
    let kind = samples
        .first()
        .map(|s| s.kind)
        .ok_or_else(|| VitalsError::NotFound(format!("metric {name}")))?;

    let measurements = samples
        .into_iter()
        .map(|s| Measurement { tags: s.tags.into_iter().collect(), value: s.value })
        .collect();

    Ok(Json(MetricDetail { name, kind, measurements }))
}
