use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use teamforge_core::OrganizationId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_organization).get(list_organizations))
        .route("/logout", post(logout_organization))
        .route("/:id/switch", post(switch_organization))
}

pub async fn create_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<dto::CreateOrganizationRequest>,
) -> axum::response::Response {
    match services.accounts.create_organization(ctx.principal(), &body.name).await {
        Ok(org) => (StatusCode::CREATED, Json(dto::organization_to_json(&org))).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn list_organizations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match services.accounts.list_organizations(ctx.principal(), query.page()).await {
        Ok(orgs) => {
            let items = orgs.iter().map(dto::organization_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn switch_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let organization_id: OrganizationId = match errors::parse_id(&id, "organization") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .accounts
        .switch_organization(ctx.principal(), organization_id)
        .await
    {
        Ok(issued) => (StatusCode::OK, Json(issued)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

/// Leave the organization: returns a fresh account token and revokes the
/// presented member token.
pub async fn logout_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> axum::response::Response {
    match services.accounts.logout_organization(ctx.session()).await {
        Ok(issued) => (StatusCode::OK, Json(issued)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}
