use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use teamforge_accounts::SignUp;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub async fn sign_up(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<SignUp>,
) -> axum::response::Response {
    match services.accounts.sign_up(body).await {
        Ok(issued) => (StatusCode::CREATED, Json(issued)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn verify_otp(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::VerifyOtpRequest>,
) -> axum::response::Response {
    match services.accounts.verify_otp(&body.email, &body.otp).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "verified": true }))).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn resend_otp(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ResendOtpRequest>,
) -> axum::response::Response {
    match services.accounts.resend_otp(&body.email).await {
        Ok(issued) => (StatusCode::OK, Json(issued)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignInRequest>,
) -> axum::response::Response {
    match services.accounts.sign_in(&body.email, &body.password).await {
        Ok(issued) => (StatusCode::OK, Json(issued)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> axum::response::Response {
    match services.accounts.logout(ctx.session()).await {
        Ok(receipt) => (StatusCode::OK, Json(dto::revocation_to_json(&receipt))).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}
