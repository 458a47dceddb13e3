use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod hosted;
pub mod models;
pub mod repository;
pub mod storage;

pub mod routes;
use handlers::{blogs, capabilities, inquiries, session, testimonials, uploads, work};
use routes::{admin, console, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use db::Database;
pub use error::{ApiError, StoreError};
pub use hosted::{HostedClients, Privilege};
pub use repository::{Repository, RepositoryState, StoreRepository};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// OpenAPI document for every handler, served at `/api-docs/openapi.json` and browsable
/// through the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        blogs::list_blogs, blogs::get_blog, blogs::get_top_featured_blog,
        blogs::admin_list_blogs, blogs::create_blog, blogs::update_blog, blogs::delete_blog,
        work::list_work, work::get_featured_work, work::get_work, work::admin_list_work,
        work::create_work, work::update_work, work::delete_work,
        capabilities::list_capability_tags, capabilities::admin_list_capabilities,
        capabilities::get_capability, capabilities::create_capability,
        capabilities::update_capability, capabilities::delete_capability,
        testimonials::list_testimonials, testimonials::admin_list_testimonials,
        testimonials::get_testimonial, testimonials::create_testimonial,
        testimonials::update_testimonial, testimonials::delete_testimonial,
        inquiries::submit_contact_inquiry, inquiries::create_contact_inquiry,
        inquiries::list_contact_inquiries, inquiries::get_contact_inquiry,
        inquiries::update_contact_inquiry, inquiries::delete_contact_inquiry,
        session::login, session::logout, uploads::upload_asset
    ),
    components(
        schemas(
            models::Blog, models::BlogInput, models::Work, models::WorkInput,
            models::Capability, models::CapabilityInput, models::Testimonial,
            models::NewTestimonial, models::ContactInquiry, models::NewContactInquiry,
            models::RecordPatch, models::DeleteResponse, models::LoginRequest,
            models::UploadResponse,
        )
    ),
    tags(
        (name = "blogs", description = "Blog posts"),
        (name = "work", description = "Portfolio of past events"),
        (name = "capabilities", description = "Capability tags"),
        (name = "testimonials", description = "Client testimonials"),
        (name = "contact", description = "Contact form leads"),
        (name = "admin", description = "Cookie-gated admin console API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Shared, cheaply clonable container for the process-wide services: the repository
/// (SQL pool and hosted clients behind it), the object store and the configuration.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- FromRef sub-states ---

// Handlers that need a single service extract it directly instead of the whole state.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles public, admin API and console routes, then wraps the whole tree in the
/// admin gate and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest("/api/intellsys", admin::admin_routes())
        .nest("/intellsys", console::console_routes(&state.config.admin_assets_dir))
        .with_state(state)
        // Applied with `layer` rather than `route_layer` so it also covers unmatched
        // console paths served by the fallback.
        .layer(middleware::from_fn(auth::admin_gate));

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request carrying method, URI and the `x-request-id` set above, so
/// all log lines of one request correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
