use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// StoreError
///
/// Anything that went wrong below the handlers: the SQL pool, the hosted backend's
/// HTTP transport, a non-success answer from the hosted backend, a successful write
/// that echoed no row, or a payload that did not decode.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("hosted backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("hosted backend returned {status}: {message}")]
    Hosted { status: u16, message: String },

    #[error("{table} write returned no rows")]
    NoRows { table: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// ApiError
///
/// The request-level error taxonomy. Validation and not-found errors carry a message
/// meant for the caller; store errors are logged and reported generically.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_names_every_field() {
        let err = ApiError::MissingFields(vec!["name", "eventType"]);
        assert_eq!(err.to_string(), "Missing required fields: name, eventType");
    }

    #[test]
    fn store_errors_map_to_500() {
        let err = ApiError::Store(StoreError::Hosted {
            status: 503,
            message: "upstream down".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            ApiError::NotFound("Blog").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
