use axum::{Router, extract::FromRef, http::HeaderName};
use std::sync::Arc;
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

// Route Table and path matching.
pub mod access;
// Client for the travel backend API.
pub mod api_client;
pub mod config;
pub mod handlers;
// Per-request access decision and the axum middleware around it.
pub mod middleware;
pub mod models;
// Denial document and page renderers.
pub mod pages;
// Cookie parsing and the Session extractor.
pub mod session;

pub mod routes;
use routes::{portal, public};

// --- Public Re-exports ---

pub use access::{RouteTable, path_matches};
pub use api_client::{ApiError, ApiState, BackendApi, HttpApiClient};
pub use config::AppConfig;
pub use middleware::{AccessControl, AccessState, Decision, enforce_access};
pub use models::{Role, Session};
pub use pages::{PageRenderer, RendererState, StaticRenderer, UpstreamRenderer};

/// ApiDoc
///
/// OpenAPI document for the gateway's own JSON endpoints, served at
/// `/api-docs/openapi.json`. Portal pages and the backend passthrough are not part of it.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::get_menu),
    components(schemas(models::MenuItem, models::Role, models::Session)),
    tags(
        (name = "travel-portal", description = "Travel Portal Gateway")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a request may need, built once at startup and shared by every request.
/// Nothing in it is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    /// Route access policy: Route Table, public routes, development bypass flag.
    pub access: AccessState,
    /// Travel backend client.
    pub api: ApiState,
    /// Renderer for allowed portal pages.
    pub renderer: RendererState,
    pub config: AppConfig,
}

impl AppState {
    /// from_config
    ///
    /// Wires the production dependencies: the standard Route Table, the reqwest backend
    /// client and, when an upstream is configured, the upstream page renderer.
    pub fn from_config(config: AppConfig) -> Result<Self, ApiError> {
        let access = Arc::new(AccessControl::new(
            Arc::new(RouteTable::standard()),
            config.dev_bypass,
        ));

        let accept_invalid_certs = config.env == config::Env::Local;
        let api = Arc::new(HttpApiClient::new(&config.api_base_url, accept_invalid_certs)?) as ApiState;

        let renderer = match &config.portal_upstream {
            Some(upstream) => Arc::new(UpstreamRenderer::new(upstream)?) as RendererState,
            None => Arc::new(StaticRenderer::new()) as RendererState,
        };

        Ok(Self {
            access,
            api,
            renderer,
            config,
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for AccessState {
    fn from_ref(app_state: &AppState) -> AccessState {
        app_state.access.clone()
    }
}

impl FromRef<AppState> for ApiState {
    fn from_ref(app_state: &AppState) -> ApiState {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for RendererState {
    fn from_ref(app_state: &AppState) -> RendererState {
        app_state.renderer.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the gateway: public endpoints as they are, portal pages behind the
/// access-control layer, then request-id, tracing and CORS around everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes(&state.config.assets_dir))
        // The layer covers the portal fallback too, so unregistered paths are checked.
        .merge(
            portal::portal_routes().layer(axum::middleware::from_fn_with_state(
                state.access.clone(),
                enforce_access,
            )),
        )
        .with_state(state);

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
/// Span for every request, tagged with the `x-request-id` set by `SetRequestIdLayer`.
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
