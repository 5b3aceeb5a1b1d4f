//! Axum router wiring for the operational endpoints.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .route("/metrics/:name", get(ops::metric_detail));

    if state.cfg().metrics.http_requests {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            obs::http::track_requests,
        ));
    }

    router.with_state(state)
}
