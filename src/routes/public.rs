use crate::{
    AppState,
    handlers::{blogs, capabilities, inquiries, testimonials, work},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// The marketing site's read surface plus the two public writes (contact form and
/// portfolio submission). Nothing here passes through the admin gate.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // --- Blogs ---
        .route("/api/blogs", get(blogs::list_blogs))
        // Static segment wins over `{id}` in the matcher.
        .route("/api/blogs/top-featured", get(blogs::get_top_featured_blog))
        .route("/api/blogs/{id}", get(blogs::get_blog))
        // --- Portfolio ---
        .route(
            "/api/our-work",
            get(work::list_work).post(work::create_work),
        )
        .route("/api/our-work/featured", get(work::get_featured_work))
        .route("/api/our-work/{id}", get(work::get_work))
        // --- Testimonials & capabilities ---
        // GET /api/testimonials?featured=true
        .route("/api/testimonials", get(testimonials::list_testimonials))
        .route(
            "/api/capabilities/tags",
            get(capabilities::list_capability_tags),
        )
        // --- Leads ---
        .route(
            "/api/contact-inquiries",
            post(inquiries::submit_contact_inquiry),
        )
}
