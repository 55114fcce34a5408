use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use teamforge_core::ProjectId;
use teamforge_workspace::{CreateProject, UpdateProject};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route("/:id", get(get_project).patch(update_project).delete(delete_project))
        .route("/:id/teams", post(assign_teams))
}

pub async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<CreateProject>,
) -> axum::response::Response {
    match services.projects.create(ctx.principal(), body).await {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match services
        .projects
        .list(ctx.principal(), query.organization_id, query.page())
        .await
    {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects.get(ctx.principal(), id).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn update_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProject>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects.update(ctx.principal(), id, body).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn delete_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects.delete(ctx.principal(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn assign_teams(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AssignTeamsRequest>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects.assign_teams(ctx.principal(), id, body.team_ids).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}
