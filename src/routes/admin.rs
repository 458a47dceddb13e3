use crate::{
    AppState,
    handlers::{
        blogs, capabilities, inquiries, session, testimonials,
        uploads::{self, MAX_UPLOAD_BYTES},
        work,
    },
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Admin Router Module
///
/// Full CRUD for every entity, nested under `/api/intellsys`. The router-wide admin
/// gate rejects these paths without the session cookie, except `/login`.
///
/// Blogs, work items and capabilities replace the whole record on PUT; testimonials
/// and contact inquiries merge the keys present in the body.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Session ---
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        // --- Asset upload ---
        .route(
            "/upload",
            post(uploads::upload_asset).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // --- Blogs ---
        .route(
            "/blogs",
            get(blogs::admin_list_blogs).post(blogs::create_blog),
        )
        .route(
            "/blogs/{id}",
            get(blogs::get_blog)
                .put(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        // --- Capabilities ---
        .route(
            "/capabilities",
            get(capabilities::admin_list_capabilities).post(capabilities::create_capability),
        )
        .route(
            "/capabilities/{id}",
            get(capabilities::get_capability)
                .put(capabilities::update_capability)
                .delete(capabilities::delete_capability),
        )
        // --- Portfolio ---
        .route(
            "/our-work",
            get(work::admin_list_work).post(work::create_work),
        )
        .route(
            "/our-work/{id}",
            get(work::get_work)
                .put(work::update_work)
                .delete(work::delete_work),
        )
        // --- Leads ---
        .route(
            "/contact-inquiries",
            get(inquiries::list_contact_inquiries).post(inquiries::create_contact_inquiry),
        )
        .route(
            "/contact-inquiries/{id}",
            get(inquiries::get_contact_inquiry)
                .put(inquiries::update_contact_inquiry)
                .delete(inquiries::delete_contact_inquiry),
        )
        // --- Testimonials ---
        .route(
            "/testimonials",
            get(testimonials::admin_list_testimonials).post(testimonials::create_testimonial),
        )
        .route(
            "/testimonials/{id}",
            get(testimonials::get_testimonial)
                .put(testimonials::update_testimonial)
                .delete(testimonials::delete_testimonial),
        )
}
