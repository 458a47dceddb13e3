use axum::{
    Json,
    extract::State,
    response::Response,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{created, deleted};
use crate::{
    AppState,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    hosted::Privilege,
    models::{ContactInquiry, DeleteResponse, NewContactInquiry, RecordPatch},
    repository::LeadFilter,
};

/// LeadQuery
///
/// Optional filters of the admin lead list.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct LeadQuery {
    /// e.g. `new`, `contacted`, `won`
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl From<LeadQuery> for LeadFilter {
    fn from(query: LeadQuery) -> Self {
        LeadFilter {
            status: query.status.filter(|s| !s.trim().is_empty()),
            priority: query.priority.filter(|p| !p.trim().is_empty()),
        }
    }
}

/// submit_contact_inquiry
///
/// [Public Route] Final submission of the contact form. `name`, `email`, `eventType`
/// and `message` are required; a 400 names every one that is missing.
#[utoipa::path(
    post,
    path = "/api/contact-inquiries",
    tag = "contact",
    request_body = NewContactInquiry,
    responses(
        (status = 201, description = "Lead stored", body = ContactInquiry),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn submit_contact_inquiry(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewContactInquiry>,
) -> Result<Response, ApiError> {
    store_inquiry(&state, Privilege::Public, payload).await
}

/// [Admin Route] Manual lead entry; same checks as the public form.
#[utoipa::path(
    post,
    path = "/api/intellsys/contact-inquiries",
    tag = "admin",
    request_body = NewContactInquiry,
    responses(
        (status = 201, description = "Lead stored", body = ContactInquiry),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn create_contact_inquiry(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewContactInquiry>,
) -> Result<Response, ApiError> {
    store_inquiry(&state, Privilege::Admin, payload).await
}

async fn store_inquiry(
    state: &AppState,
    privilege: Privilege,
    payload: NewContactInquiry,
) -> Result<Response, ApiError> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let inquiry = state
        .repo
        .create_inquiry(privilege, payload.into_insert(chrono::Utc::now()))
        .await?;
    tracing::info!(id = %inquiry.id, ?privilege, "contact inquiry stored");
    Ok(created(inquiry))
}

/// [Admin Route] Leads, newest first, optionally narrowed by status and priority.
#[utoipa::path(
    get,
    path = "/api/intellsys/contact-inquiries",
    tag = "admin",
    params(LeadQuery),
    responses((status = 200, description = "Leads", body = [ContactInquiry]))
)]
pub async fn list_contact_inquiries(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LeadQuery>,
) -> Result<Json<Vec<ContactInquiry>>, ApiError> {
    Ok(Json(state.repo.list_inquiries(query.into()).await?))
}

#[utoipa::path(
    get,
    path = "/api/intellsys/contact-inquiries/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Found", body = ContactInquiry),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_contact_inquiry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ContactInquiry>, ApiError> {
    state
        .repo
        .get_inquiry(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Contact inquiry"))
}

/// update_contact_inquiry
///
/// [Admin Route] Partial merge, typically `status`, `priority` or `admin_notes`.
#[utoipa::path(
    put,
    path = "/api/intellsys/contact-inquiries/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Lead ID")),
    request_body = RecordPatch,
    responses(
        (status = 200, description = "Merged", body = ContactInquiry),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_contact_inquiry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<RecordPatch>,
) -> Result<Json<ContactInquiry>, ApiError> {
    state
        .repo
        .merge_inquiry(id, patch)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Contact inquiry"))
}

#[utoipa::path(
    delete,
    path = "/api/intellsys/contact-inquiries/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_contact_inquiry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    deleted(state.repo.delete_inquiry(id).await?, id, "Contact inquiry")
}
