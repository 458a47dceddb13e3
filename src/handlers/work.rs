use axum::{
    Json,
    extract::State,
    response::Response,
};
use uuid::Uuid;

use super::{FEATURED_WORK_LIMIT, cached, created, deleted};
use crate::{
    AppState,
    error::ApiError,
    extract::{ApiJson, ApiPath},
    models::{DeleteResponse, Work, WorkInput},
};

/// list_work
///
/// [Public Route] The whole portfolio, newest first.
#[utoipa::path(
    get,
    path = "/api/our-work",
    tag = "work",
    responses((status = 200, description = "Portfolio entries", body = [Work]))
)]
pub async fn list_work(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(cached(state.repo.list_work().await?))
}

/// get_featured_work
///
/// [Public Route] At most three featured entries for the home page, newest first.
#[utoipa::path(
    get,
    path = "/api/our-work/featured",
    tag = "work",
    responses((status = 200, description = "Featured entries (max 3)", body = [Work]))
)]
pub async fn get_featured_work(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(cached(state.repo.featured_work(FEATURED_WORK_LIMIT).await?))
}

#[utoipa::path(
    get,
    path = "/api/our-work/{id}",
    tag = "work",
    params(("id" = Uuid, Path, description = "Work item ID")),
    responses(
        (status = 200, description = "Found", body = Work),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_work(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Work>, ApiError> {
    state
        .repo
        .get_work(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Work item"))
}

#[utoipa::path(
    get,
    path = "/api/intellsys/our-work",
    tag = "admin",
    responses((status = 200, description = "Portfolio entries", body = [Work]))
)]
pub async fn admin_list_work(State(state): State<AppState>) -> Result<Json<Vec<Work>>, ApiError> {
    Ok(Json(state.repo.list_work().await?))
}

/// create_work
///
/// Mounted both on the public `/api/our-work` collection and on the admin surface.
#[utoipa::path(
    post,
    path = "/api/our-work",
    tag = "work",
    request_body = WorkInput,
    responses((status = 201, description = "Created", body = Work))
)]
pub async fn create_work(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WorkInput>,
) -> Result<Response, ApiError> {
    let work = state.repo.create_work(payload).await?;
    tracing::info!(id = %work.id, "work item created");
    Ok(created(work))
}

/// update_work
///
/// [Admin Route] Full replace of the entry.
#[utoipa::path(
    put,
    path = "/api/intellsys/our-work/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Work item ID")),
    request_body = WorkInput,
    responses(
        (status = 200, description = "Replaced", body = Work),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_work(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<WorkInput>,
) -> Result<Json<Work>, ApiError> {
    state
        .repo
        .replace_work(id, payload)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Work item"))
}

#[utoipa::path(
    delete,
    path = "/api/intellsys/our-work/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Work item ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_work(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    deleted(state.repo.delete_work(id).await?, id, "Work item")
}
