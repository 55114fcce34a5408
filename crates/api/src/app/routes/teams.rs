use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use teamforge_core::TeamId;
use teamforge_workspace::{CreateTeam, UpdateTeam};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_team).get(list_teams))
        .route("/:id", get(get_team).patch(update_team).delete(delete_team))
}

pub async fn create_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<CreateTeam>,
) -> axum::response::Response {
    match services.teams.create(ctx.principal(), body).await {
        Ok(team) => (StatusCode::CREATED, Json(team)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn list_teams(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match services
        .teams
        .list(ctx.principal(), query.organization_id, query.page())
        .await
    {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn get_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TeamId = match errors::parse_id(&id, "team") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.teams.get(ctx.principal(), id).await {
        Ok(team) => (StatusCode::OK, Json(team)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn update_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTeam>,
) -> axum::response::Response {
    let id: TeamId = match errors::parse_id(&id, "team") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.teams.update(ctx.principal(), id, body).await {
        Ok(team) => (StatusCode::OK, Json(team)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn delete_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TeamId = match errors::parse_id(&id, "team") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.teams.delete(ctx.principal(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}
