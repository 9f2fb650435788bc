use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::Session;

// --- Cookie Contract ---

pub const USERNAME_COOKIE: &str = "username";
pub const USER_ID_COOKIE: &str = "user_id";
pub const DEPARTMENT_COOKIE: &str = "department_id";
pub const ROLE_COOKIE: &str = "role";
pub const TOKEN_COOKIE: &str = "token";

/// parse_cookies
///
/// The one place where the raw `Cookie` header is turned into a typed jar. Both the
/// access-control middleware and the `Session` extractor go through here, so they can
/// never disagree about what a request carries. Values are percent-decoded
/// (`Cuentas%20por%20pagar` becomes `Cuentas por pagar`).
///
/// When a name repeats, the first occurrence wins. Browsers send the most specific
/// cookie first.
pub fn parse_cookies(headers: &HeaderMap) -> CookieJar {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| Cookie::parse_encoded(pair.trim().to_owned()).ok())
        .fold(CookieJar::new(), |jar, cookie| {
            if jar.get(cookie.name()).is_some() {
                jar
            } else {
                jar.add(cookie)
            }
        })
}

fn cookie_value(jar: &CookieJar, name: &str) -> String {
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_default()
}

impl Session {
    /// from_cookies
    ///
    /// Builds a session from the five contract cookies. A missing cookie becomes an
    /// empty string; an empty `department_id` becomes `None`. Values are not validated.
    pub fn from_cookies(jar: &CookieJar) -> Self {
        let department_id = Some(cookie_value(jar, DEPARTMENT_COOKIE)).filter(|d| !d.is_empty());

        Self {
            username: cookie_value(jar, USERNAME_COOKIE),
            id: cookie_value(jar, USER_ID_COOKIE),
            role: cookie_value(jar, ROLE_COOKIE),
            department_id,
            token: cookie_value(jar, TOKEN_COOKIE),
        }
    }
}

/// resolve_session
///
/// Resolves a session from an explicitly supplied cookie source. Without one there is
/// no session at all; whether to fall back to anything is the caller's decision.
pub fn resolve_session(cookies: Option<&CookieJar>) -> Option<Session> {
    match cookies {
        Some(jar) => Some(Session::from_cookies(jar)),
        None => {
            tracing::debug!("No cookie source supplied, no session resolved");
            None
        }
    }
}

/// session_cookies
///
/// The cookies that carry `session` on the browser side, all on path `/`.
/// The token cookie is additionally `Secure` and `SameSite=Strict`.
pub fn session_cookies(session: &Session) -> Vec<Cookie<'static>> {
    let plain = |name: &'static str, value: &str| {
        Cookie::build((name, value.to_string())).path("/").build()
    };

    vec![
        plain(USERNAME_COOKIE, &session.username),
        plain(USER_ID_COOKIE, &session.id),
        plain(
            DEPARTMENT_COOKIE,
            session.department_id.as_deref().unwrap_or_default(),
        ),
        plain(ROLE_COOKIE, &session.role),
        Cookie::build((TOKEN_COOKIE, session.token.clone()))
            .path("/")
            .secure(true)
            .same_site(SameSite::Strict)
            .build(),
    ]
}

/// Session Extractor
///
/// Handlers behind the access-control layer receive the session the middleware already
/// settled on (including a development-bypass session). Anywhere else the session is
/// read from the request cookies. Extraction never fails: an anonymous request yields a
/// session with empty fields.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(session.clone());
        }

        Ok(Session::from_cookies(&parse_cookies(&parts.headers)))
    }
}

/// cookie_header
///
/// Renders `session` as a request `Cookie` header value, for forwarding a session the
/// browser does not hold yet (development bypass) to the page renderer.
pub fn cookie_header(session: &Session) -> String {
    session_cookies(session)
        .iter()
        .map(|cookie| cookie.encoded().stripped().to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
