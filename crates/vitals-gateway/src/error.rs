//! HTTP mapping for `VitalsError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use vitals_core::error::VitalsError;

/// Handler error rendered as `{"code": "...", "msg": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub VitalsError);

impl From<VitalsError> for ApiError {
    fn from(e: VitalsError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({ "code": code.as_str(), "msg": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
