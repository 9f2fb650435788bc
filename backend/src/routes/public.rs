use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};
use tower_http::services::{ServeDir, ServeFile};

/// Public Router Module
///
/// Endpoints that bypass page access control. None of them renders a portal page:
/// health checks, JSON helpers for the frontend, the backend passthrough (the backend checks
/// the bearer token itself) and the built static assets.
pub fn public_routes(assets_dir: &str) -> Router<AppState> {
    Router::new()
        // GET /health
        .route("/health", get(handlers::health))
        // GET /menu
        // Sidebar entries for the role in the caller's cookies.
        .route("/menu", get(handlers::get_menu))
        // GET/POST/PUT /api/{*path}
        // Same-origin passthrough to the travel backend with the session bearer token.
        .route(
            "/api/{*path}",
            get(handlers::proxy_api)
                .post(handlers::proxy_api)
                .put(handlers::proxy_api),
        )
        // Hashed build assets and the favicon, straight from disk.
        .nest_service("/_astro", ServeDir::new(format!("{assets_dir}/_astro")))
        .route_service(
            "/favicon.svg",
            ServeFile::new(format!("{assets_dir}/favicon.svg")),
        )
}
