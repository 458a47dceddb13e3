//! HTTP handlers, one module per resource. Each handler validates what little it has
//! to, makes one repository call and maps the outcome onto a status code.

pub mod blogs;
pub mod capabilities;
pub mod inquiries;
pub mod session;
pub mod testimonials;
pub mod uploads;
pub mod work;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{error::ApiError, models::DeleteResponse};

/// Lets an edge cache serve public collections for five minutes and revalidate for ten more.
pub const PUBLIC_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";

/// Upper bound on records returned by the featured work endpoint.
pub const FEATURED_WORK_LIMIT: i64 = 3;

/// JSON body with the public cache policy attached.
pub(crate) fn cached<T: Serialize>(body: T) -> Response {
    (
        [(header::CACHE_CONTROL, PUBLIC_CACHE_CONTROL)],
        Json(body),
    )
        .into_response()
}

pub(crate) fn created<T: Serialize>(body: T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Maps a repository delete outcome onto the shared delete response.
pub(crate) fn deleted(
    removed: bool,
    id: Uuid,
    entity: &'static str,
) -> Result<Json<DeleteResponse>, ApiError> {
    if removed {
        tracing::info!(%id, entity, "record deleted");
        Ok(Json(DeleteResponse { success: true, id }))
    } else {
        Err(ApiError::NotFound(entity))
    }
}
