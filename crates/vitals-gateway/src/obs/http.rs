//! HTTP request counting middleware.
//!
//! Records `http_server_requests_total{method,uri,status}` for every request
//! the router answers. `uri` is the matched route template so path parameters
//! do not explode the series count; unmatched requests use `UNKNOWN`.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

pub const HTTP_REQUESTS: &str = "http_server_requests_total";

pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let uri = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "UNKNOWN".to_owned());

    let resp = next.run(req).await;

    let status = resp.status().as_u16().to_string();
    if let Err(e) = state.metrics().inc(
        HTTP_REQUESTS,
        &[("method", method.as_str()), ("uri", uri.as_str()), ("status", status.as_str())],
    ) {
        tracing::warn!(error = %e, "failed to record http request");
    }
    resp
}
