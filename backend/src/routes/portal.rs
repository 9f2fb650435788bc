use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Portal Router Module
///
/// Every page of the travel portal. The whole router, fallback included, sits behind
/// the `enforce_access` layer applied in `create_router`, so no handler here is reached
/// without an access decision.
///
/// Only `/login` and `/404` are registered explicitly (both public). Every other path
/// falls through to `render_page`; whether it exists is the Route Table's business, not
/// the router's.
pub fn portal_routes() -> Router<AppState> {
    Router::new()
        // GET /login
        // Rendered by the page renderer like any other page, but reachable without a session.
        .route("/login", get(handlers::render_page))
        // GET /404
        // The denial document itself, served directly.
        .route("/404", get(handlers::not_found))
        // Everything else: allowed role pages, rendered upstream.
        .fallback(handlers::render_page)
}
