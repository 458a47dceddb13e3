use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    auth::{cleared_cookie, session_cookie},
    config::{AppConfig, Env},
    error::ApiError,
    extract::ApiJson,
    models::LoginRequest,
};

/// login
///
/// [Admin Route, ungated] Checks the console password and, on success, issues the
/// `admin-authenticated` cookie the gate looks for.
#[utoipa::path(
    post,
    path = "/api/intellsys/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Cookie issued"),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn login(
    State(config): State<AppConfig>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    if payload.password != config.admin_password {
        tracing::warn!("admin login rejected");
        return Err(ApiError::Unauthorized);
    }

    let secure = config.env == Env::Production;
    tracing::info!("admin login accepted");
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(secure))],
        Json(json!({ "success": true })),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/intellsys/logout",
    tag = "admin",
    responses((status = 200, description = "Cookie cleared"))
)]
pub async fn logout() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
