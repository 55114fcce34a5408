use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use teamforge_auth::{AuthorizationGuard, bearer_token};

use crate::app::errors;
use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub guard: AuthorizationGuard,
}

/// Run the authorization guard and attach the session to the request.
///
/// Rejected requests never reach a handler.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token.map(str::to_string),
        Err(status) => {
            return errors::json_error(status, "invalid_credential", "malformed authorization header");
        }
    };

    let session = match state.guard.authorize(token.as_deref(), Utc::now()).await {
        Ok(session) => session,
        Err(e) => return errors::access_error_to_response(e),
    };

    req.extensions_mut().insert(SessionContext::new(session));
    next.run(req).await
}

/// `Ok(None)` when no header is present; the guard reports that as missing.
fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, StatusCode> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(bearer_token(header))
}
