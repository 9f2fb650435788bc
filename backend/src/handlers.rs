use axum::{
    Json,
    body::{Bytes, to_bytes},
    extract::{Path, RawQuery, Request, State},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    api_client::{ApiError, ApiRequest, ApiState},
    models::{MenuItem, Session, sidebar_for},
    pages::{PageRequest, RendererState, not_found_response},
    session::{ROLE_COOKIE, cookie_header, parse_cookies},
};

/// Largest request body forwarded to the page renderer.
const MAX_PAGE_BODY: usize = 2 * 1024 * 1024;

// --- Public Handlers ---

/// health
///
/// [Public Route] Liveness check for load balancers.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Gateway is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// get_menu
///
/// [Public Route] Sidebar entries for the caller's role.
/// No role cookie is a 401; a role the portal does not know gets an empty menu.
#[utoipa::path(
    get,
    path = "/menu",
    responses(
        (status = 200, description = "Sidebar for the session role", body = [MenuItem]),
        (status = 401, description = "No role cookie")
    )
)]
pub async fn get_menu(session: Session) -> Result<Json<Vec<MenuItem>>, StatusCode> {
    if !session.has_role() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Json(session.role().map(sidebar_for).unwrap_or_default()))
}

/// proxy_api
///
/// [Public Route] Same-origin passthrough to the travel backend for GET/POST/PUT.
/// `/api/<path>?<query>` becomes `<api base><path>?<query>` with the session's bearer
/// token attached. Backend rejections are relayed with their status and body.
pub async fn proxy_api(
    State(api): State<ApiState>,
    session: Session,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        }
    };

    let path = match query {
        Some(query) => format!("/{path}?{query}"),
        None => format!("/{path}"),
    };

    let request = match (method, body) {
        (Method::GET, _) => ApiRequest::get(path),
        (Method::POST, body) => ApiRequest::post(path, body.unwrap_or(Value::Null)),
        (Method::PUT, body) => ApiRequest::put(path, body.unwrap_or(Value::Null)),
        _ => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
    };

    match api.request(request, Some(&session)).await {
        Ok(value) => Json(value).into_response(),
        Err(ApiError::Status { status, body }) => (status, Json(body)).into_response(),
        Err(ApiError::InvalidHeader(_)) => StatusCode::BAD_REQUEST.into_response(),
        Err(ApiError::Network(_) | ApiError::Decode(_)) => StatusCode::BAD_GATEWAY.into_response(),
    }
}

// --- Portal Handlers (behind access control) ---

/// not_found
///
/// [Portal Route] The explicit `/404` page. Always public.
pub async fn not_found(session: Session, uri: Uri) -> Response {
    not_found_response(uri.path(), session.is_authenticated())
}

/// render_page
///
/// [Portal Route] Hands an allowed request to the page renderer. The session arrives
/// from the access middleware; when the browser does not carry it yet (development
/// bypass) the renderer gets it as a synthesized `Cookie` header.
pub async fn render_page(
    State(renderer): State<RendererState>,
    session: Session,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();

    let body = match to_bytes(body, MAX_PAGE_BODY).await {
        Ok(body) => body,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    let browser_has_role = parse_cookies(&parts.headers)
        .get(ROLE_COOKIE)
        .is_some_and(|cookie| !cookie.value().is_empty());
    let cookie = if session.has_role() && !browser_has_role {
        HeaderValue::from_str(&cookie_header(&session)).ok()
    } else {
        parts.headers.get(header::COOKIE).cloned()
    };

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let page = PageRequest {
        method: parts.method,
        path_and_query,
        cookie,
        body,
    };

    match renderer.render(page, &session).await {
        Ok(page) => page.into_response(),
        Err(status) => status.into_response(),
    }
}
