use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::dto;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(ctx): Extension<SessionContext>) -> impl IntoResponse {
    let mut body = dto::session_to_json(ctx.session());
    body["organizationId"] = serde_json::json!(ctx.organization_id().map(|id| id.to_string()));
    Json(body)
}
