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
    models::{Blog, BlogInput, DeleteResponse},
};

/// list_blogs
///
/// [Public Route] Every post, newest first. Cacheable at the edge.
#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "blogs",
    responses(
        (status = 200, description = "All posts, newest first", body = [Blog]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(cached(state.repo.list_blogs().await?))
}

/// get_blog
///
/// [Public Route] A single post. Also mounted on the admin surface.
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    tag = "blogs",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Found", body = Blog),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Blog>, ApiError> {
    state
        .repo
        .get_blog(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Blog"))
}

/// get_top_featured_blog
///
/// [Public Route] The post pinned to the top of the blog page. 404 when no post
/// holds the flag.
#[utoipa::path(
    get,
    path = "/api/blogs/top-featured",
    tag = "blogs",
    responses(
        (status = 200, description = "The top-featured post", body = Blog),
        (status = 404, description = "No post is top-featured")
    )
)]
pub async fn get_top_featured_blog(State(state): State<AppState>) -> Result<Json<Blog>, ApiError> {
    state
        .repo
        .top_featured_blog()
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Top featured blog"))
}

/// [Admin Route] Every post, uncached.
#[utoipa::path(
    get,
    path = "/api/intellsys/blogs",
    tag = "admin",
    responses((status = 200, description = "All posts", body = [Blog]))
)]
pub async fn admin_list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, ApiError> {
    Ok(Json(state.repo.list_blogs().await?))
}

#[utoipa::path(
    post,
    path = "/api/intellsys/blogs",
    tag = "admin",
    request_body = BlogInput,
    responses((status = 201, description = "Created", body = Blog))
)]
pub async fn create_blog(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BlogInput>,
) -> Result<Response, ApiError> {
    let blog = state.repo.create_blog(payload).await?;
    tracing::info!(id = %blog.id, "blog created");
    Ok(created(blog))
}

/// update_blog
///
/// [Admin Route] Full replace: the body is the whole post, omitted fields are cleared.
#[utoipa::path(
    put,
    path = "/api/intellsys/blogs/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = BlogInput,
    responses(
        (status = 200, description = "Replaced", body = Blog),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BlogInput>,
) -> Result<Json<Blog>, ApiError> {
    state
        .repo
        .replace_blog(id, payload)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Blog"))
}

#[utoipa::path(
    delete,
    path = "/api/intellsys/blogs/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    deleted(state.repo.delete_blog(id).await?, id, "Blog")
}
