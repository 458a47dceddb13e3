use axum::{
    Json,
    extract::State,
    response::Response,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{cached, created, deleted};
use crate::{
    AppState,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    hosted::Privilege,
    models::{
        DEFAULT_RATING, DeleteResponse, MAX_RATING, MIN_RATING, NewTestimonial, RecordPatch,
        Testimonial,
    },
};

/// TestimonialFilter
///
/// Query parameters of the public testimonial listing.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct TestimonialFilter {
    /// Only testimonials flagged for the home page.
    pub featured: Option<bool>,
}

/// list_testimonials
///
/// [Public Route] Read with the public key, ordered by `sort_order`.
#[utoipa::path(
    get,
    path = "/api/testimonials",
    tag = "testimonials",
    params(TestimonialFilter),
    responses((status = 200, description = "Testimonials", body = [Testimonial]))
)]
pub async fn list_testimonials(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TestimonialFilter>,
) -> Result<Response, ApiError> {
    let featured_only = filter.featured.unwrap_or(false);
    let testimonials = state
        .repo
        .list_testimonials(Privilege::Public, featured_only)
        .await?;
    Ok(cached(testimonials))
}

#[utoipa::path(
    get,
    path = "/api/intellsys/testimonials",
    tag = "admin",
    responses((status = 200, description = "Testimonials", body = [Testimonial]))
)]
pub async fn admin_list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    Ok(Json(
        state.repo.list_testimonials(Privilege::Admin, false).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/intellsys/testimonials/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Found", body = Testimonial),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_testimonial(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Testimonial>, ApiError> {
    state
        .repo
        .get_testimonial(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Testimonial"))
}

/// create_testimonial
///
/// [Admin Route] Rejects ratings outside 1..=5 with 400. A missing rating is stored
/// as 5. No other field is inspected.
#[utoipa::path(
    post,
    path = "/api/intellsys/testimonials",
    tag = "admin",
    request_body = NewTestimonial,
    responses(
        (status = 201, description = "Created", body = Testimonial),
        (status = 400, description = "Rating out of range")
    )
)]
pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(mut payload): Json<NewTestimonial>,
) -> Result<Response, ApiError> {
    payload.rating = Some(validate_rating(payload.rating)?);
    let testimonial = state.repo.create_testimonial(payload).await?;
    tracing::info!(id = %testimonial.id, "testimonial created");
    Ok(created(testimonial))
}

/// update_testimonial
///
/// [Admin Route] Partial merge: only the keys present in the body are written.
#[utoipa::path(
    put,
    path = "/api/intellsys/testimonials/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    request_body = RecordPatch,
    responses(
        (status = 200, description = "Merged", body = Testimonial),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_testimonial(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<RecordPatch>,
) -> Result<Json<Testimonial>, ApiError> {
    state
        .repo
        .merge_testimonial(id, patch)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Testimonial"))
}

#[utoipa::path(
    delete,
    path = "/api/intellsys/testimonials/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_testimonial(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    deleted(state.repo.delete_testimonial(id).await?, id, "Testimonial")
}

pub fn validate_rating(rating: Option<i32>) -> Result<i32, ApiError> {
    let rating = rating.unwrap_or(DEFAULT_RATING);
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(ApiError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )))
    }
}
