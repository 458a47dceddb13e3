use crate::AppState;
use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Console Router Module
///
/// Serves the admin console's static build under `/intellsys`. The login page is
/// `login.html` in the assets directory; everything else resolves against the
/// directory, with `index.html` for directory paths. Access is decided by the
/// router-wide admin gate before these services run.
pub fn console_routes(assets_dir: &str) -> Router<AppState> {
    let root = Path::new(assets_dir);
    Router::new()
        .route_service("/login", ServeFile::new(root.join("login.html")))
        .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
}
