use axum::{
    Json,
    extract::State,
    response::Response,
};
use uuid::Uuid;

use super::{cached, created, deleted};
use crate::{
    AppState,
    error::ApiError,
    extract::{ApiJson, ApiPath},
    models::{Capability, CapabilityInput, DeleteResponse},
};

/// list_capability_tags
///
/// [Public Route] Capability tags in display order (`sort_order`).
#[utoipa::path(
    get,
    path = "/api/capabilities/tags",
    tag = "capabilities",
    responses((status = 200, description = "Capabilities by sort order", body = [Capability]))
)]
pub async fn list_capability_tags(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(cached(state.repo.list_capabilities().await?))
}

#[utoipa::path(
    get,
    path = "/api/intellsys/capabilities",
    tag = "admin",
    responses((status = 200, description = "Capabilities by sort order", body = [Capability]))
)]
pub async fn admin_list_capabilities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Capability>>, ApiError> {
    Ok(Json(state.repo.list_capabilities().await?))
}

#[utoipa::path(
    get,
    path = "/api/intellsys/capabilities/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Capability ID")),
    responses(
        (status = 200, description = "Found", body = Capability),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_capability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Capability>, ApiError> {
    state
        .repo
        .get_capability(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Capability"))
}

#[utoipa::path(
    post,
    path = "/api/intellsys/capabilities",
    tag = "admin",
    request_body = CapabilityInput,
    responses((status = 201, description = "Created", body = Capability))
)]
pub async fn create_capability(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CapabilityInput>,
) -> Result<Response, ApiError> {
    let capability = state.repo.create_capability(payload).await?;
    tracing::info!(id = %capability.id, "capability created");
    Ok(created(capability))
}

/// update_capability
///
/// [Admin Route] Full replace, including the ordered feature list.
#[utoipa::path(
    put,
    path = "/api/intellsys/capabilities/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Capability ID")),
    request_body = CapabilityInput,
    responses(
        (status = 200, description = "Replaced", body = Capability),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_capability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CapabilityInput>,
) -> Result<Json<Capability>, ApiError> {
    state
        .repo
        .replace_capability(id, payload)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Capability"))
}

#[utoipa::path(
    delete,
    path = "/api/intellsys/capabilities/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Capability ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_capability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    deleted(state.repo.delete_capability(id).await?, id, "Capability")
}
