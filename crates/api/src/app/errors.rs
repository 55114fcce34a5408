use core::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use teamforge_auth::{AccessError, CredentialError};

pub fn access_error_to_response(err: AccessError) -> axum::response::Response {
    let status = match &err {
        AccessError::Credential(CredentialError::InvalidOtp) => StatusCode::BAD_REQUEST,
        AccessError::Credential(_) => StatusCode::UNAUTHORIZED,
        AccessError::Forbidden(_) => StatusCode::FORBIDDEN,
        AccessError::NotFound(_) => StatusCode::NOT_FOUND,
        AccessError::Conflict(_) => StatusCode::CONFLICT,
        AccessError::Validation(_) => StatusCode::BAD_REQUEST,
        AccessError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AccessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path identifier, answering 400 `invalid_id` on failure.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id")))
}
