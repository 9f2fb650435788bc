use axum::{
    extract::{Request, State},
    http::{StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::{
    access::{PUBLIC_ROUTES, RouteTable, path_matches},
    models::Session,
    pages::not_found_response,
    session::{parse_cookies, session_cookies},
};

/// Where unauthenticated visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Decision
///
/// Terminal outcome of the access check for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Public route; no session was looked at.
    Public,
    /// The role may see the path. The session travels on to the page handler.
    Allow { session: Session },
    /// No role at all: 302 to the login page.
    RedirectToLogin,
    /// Unknown path, or a path this role may not see. Both render the same 404.
    NotFound { authenticated: bool },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Public | Decision::Allow { .. })
    }
}

/// AccessOutcome
///
/// The decision plus the session fabricated by the development bypass, if it fired.
/// That session has to be written back as cookies on whatever response goes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOutcome {
    pub decision: Decision,
    pub issued_session: Option<Session>,
}

/// AccessControl
///
/// Route access policy for the portal pages. Everything it needs is handed in at
/// construction, so tests can build one per table and flag combination.
#[derive(Debug, Clone)]
pub struct AccessControl {
    table: Arc<RouteTable>,
    public_routes: Vec<String>,
    dev_bypass: bool,
}

pub type AccessState = Arc<AccessControl>;

impl AccessControl {
    pub fn new(table: Arc<RouteTable>, dev_bypass: bool) -> Self {
        Self {
            table,
            public_routes: PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
            dev_bypass,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn dev_bypass(&self) -> bool {
        self.dev_bypass
    }

    /// decide
    ///
    /// Runs the checks in order and stops at the first terminal outcome:
    /// 1. public route, 2. session from cookies, 3. development bypass when no role,
    /// 4. no role, 5. path unknown to every role, 6. path not allowed for this role.
    ///
    /// `path` is matched after dot-segment resolution (see [`normalize_path`]).
    /// Pure: the same path and cookies always produce the same outcome.
    pub fn decide(&self, path: &str, cookies: &CookieJar) -> AccessOutcome {
        let normalized = normalize_path(path);
        let path = normalized.as_deref().unwrap_or(path);

        if path_matches(path, &self.public_routes) {
            return AccessOutcome {
                decision: Decision::Public,
                issued_session: None,
            };
        }

        let mut session = Session::from_cookies(cookies);
        let mut issued_session = None;

        if self.dev_bypass && !session.has_role() {
            tracing::warn!(path = %path, "Development bypass issuing mock session");
            session = Session::mock();
            issued_session = Some(session.clone());
        }

        let decision = self.authorize(path, session);
        AccessOutcome {
            decision,
            issued_session,
        }
    }

    fn authorize(&self, path: &str, session: Session) -> Decision {
        if !session.has_role() {
            tracing::debug!(path = %path, "No role cookie, redirecting to login");
            return Decision::RedirectToLogin;
        }

        let authenticated = session.is_authenticated();

        if !self.table.is_known(path) {
            tracing::debug!(path = %path, "Path unknown to every role");
            return Decision::NotFound { authenticated };
        }

        if session.role().is_none() {
            tracing::warn!(role = %session.role, path = %path, "Unrecognized role cookie, denying");
        }

        if !self.table.is_allowed(&session.role, path) {
            tracing::debug!(role = %session.role, path = %path, "Role not allowed on path");
            return Decision::NotFound { authenticated };
        }

        Decision::Allow { session }
    }
}

/// enforce_access
///
/// Axum middleware around [`AccessControl::decide`]. Allowed requests carry their
/// `Session` in the request extensions; denials never reach the inner handler.
pub async fn enforce_access(
    State(access): State<AccessState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookies = parse_cookies(request.headers());

    // Decide on the resolved path and hand that same path downstream.
    let raw_path = request.uri().path().to_string();
    let Some(path) = normalize_path(&raw_path) else {
        tracing::debug!(path = %raw_path, "Unparseable request path");
        return not_found_response(&raw_path, Session::from_cookies(&cookies).is_authenticated());
    };
    if path != raw_path {
        match with_path(request.uri(), &path) {
            Some(uri) => *request.uri_mut() = uri,
            None => {
                return not_found_response(&path, Session::from_cookies(&cookies).is_authenticated());
            }
        }
    }

    let AccessOutcome {
        decision,
        issued_session,
    } = access.decide(&path, &cookies);

    let response = match decision {
        Decision::Public => next.run(request).await,
        Decision::Allow { session } => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Decision::RedirectToLogin => login_redirect(),
        Decision::NotFound { authenticated } => not_found_response(&path, authenticated),
    };

    match issued_session {
        Some(session) => {
            let jar = session_cookies(&session)
                .into_iter()
                .fold(CookieJar::new(), |jar, cookie| jar.add(cookie));
            (jar, response).into_response()
        }
        None => response,
    }
}

/// normalize_path
///
/// Resolves `.` and `..` segments, percent-encoded forms (`%2e`, `%2E`) included, with
/// the same WHATWG URL parser the page renderer's HTTP client applies to the forwarded
/// path. `/editar-solicitud/../crear-usuario` becomes `/crear-usuario`; `..` never
/// climbs above `/`. `None` when the path does not form a URL.
pub fn normalize_path(path: &str) -> Option<String> {
    let url = reqwest::Url::parse(&format!("http://portal{path}")).ok()?;
    Some(url.path().to_string())
}

/// `uri` with its path replaced and its query kept.
fn with_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

/// 302 to the login page, no body.
fn login_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, LOGIN_ROUTE)]).into_response()
}
