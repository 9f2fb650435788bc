use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, Request, header},
};
use axum_extra::extract::cookie::SameSite;
use travel_portal::{
    Role, Session,
    session::{cookie_header, parse_cookies, resolve_session, session_cookies},
};

fn headers_with_cookie(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    headers
}

#[test]
fn test_session_from_full_cookie_set() {
    let jar = parse_cookies(&headers_with_cookie(
        "username=Ana%20Ruiz; user_id=17; department_id=4; role=N1; token=abc.def",
    ));
    let session = Session::from_cookies(&jar);

    assert_eq!(session.username, "Ana Ruiz");
    assert_eq!(session.id, "17");
    assert_eq!(session.department_id.as_deref(), Some("4"));
    assert_eq!(session.role, "N1");
    assert_eq!(session.role(), Some(Role::N1));
    assert_eq!(session.token, "abc.def");
    assert!(session.is_authenticated());
}

#[test]
fn test_missing_cookies_become_empty() {
    let session = Session::from_cookies(&parse_cookies(&HeaderMap::new()));

    assert_eq!(session, Session::default());
    assert_eq!(session.department_id, None);
    assert!(!session.has_role());
    assert!(!session.is_authenticated());
}

#[test]
fn test_role_value_is_not_validated() {
    let session = Session::from_cookies(&parse_cookies(&headers_with_cookie("role=Gerente")));

    assert_eq!(session.role, "Gerente");
    assert_eq!(session.role(), None);
    assert!(session.has_role());
    assert!(session.is_authenticated());
}

#[test]
fn test_token_alone_is_authenticated() {
    let session = Session::from_cookies(&parse_cookies(&headers_with_cookie("token=abc")));
    assert!(session.is_authenticated());
    assert!(!session.has_role());
}

#[test]
fn test_empty_department_is_none() {
    let session = Session::from_cookies(&parse_cookies(&headers_with_cookie(
        "department_id=; role=Solicitante",
    )));
    assert_eq!(session.department_id, None);
}

#[test]
fn test_first_duplicate_cookie_wins() {
    let session = Session::from_cookies(&parse_cookies(&headers_with_cookie(
        "role=Solicitante; token=a; role=Administrador; token=b",
    )));
    assert_eq!(session.role(), Some(Role::Solicitante));
    assert_eq!(session.token, "a");
}

#[test]
fn test_cookies_across_several_headers() {
    let mut headers = headers_with_cookie("role=N1");
    headers.append(header::COOKIE, HeaderValue::from_static("role=N2; user_id=8"));

    let session = Session::from_cookies(&parse_cookies(&headers));
    assert_eq!(session.role(), Some(Role::N1));
    assert_eq!(session.id, "8");
}

#[test]
fn test_resolve_without_source_yields_nothing() {
    assert_eq!(resolve_session(None), None);

    let jar = parse_cookies(&headers_with_cookie("role=Administrador"));
    let session = resolve_session(Some(&jar)).unwrap();
    assert_eq!(session.role(), Some(Role::Administrador));
}

#[test]
fn test_session_cookie_attributes() {
    let cookies = session_cookies(&Session::mock());
    let names: Vec<&str> = cookies.iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        ["username", "user_id", "department_id", "role", "token"]
    );

    for cookie in &cookies {
        assert_eq!(cookie.path(), Some("/"));
    }

    let token = cookies.iter().find(|c| c.name() == "token").unwrap();
    assert_eq!(token.value(), "token");
    assert_eq!(token.secure(), Some(true));
    assert_eq!(token.same_site(), Some(SameSite::Strict));

    let role = cookies.iter().find(|c| c.name() == "role").unwrap();
    assert_eq!(role.value(), "Solicitante");
    assert_eq!(role.secure(), None);
}

#[test]
fn test_cookie_header_reparses_to_same_session() {
    let session = Session {
        username: "Luis".to_string(),
        id: "3".to_string(),
        role: "Agencia de viajes".to_string(),
        department_id: Some("9".to_string()),
        token: "xyz".to_string(),
    };

    let header_value = cookie_header(&session);
    let reparsed = Session::from_cookies(&parse_cookies(&headers_with_cookie(&header_value)));
    assert_eq!(reparsed, session);
}

#[tokio::test]
async fn test_extractor_reads_cookies() {
    let request = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, "role=N2; token=t")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let session = Session::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(session.role(), Some(Role::N2));
    assert_eq!(session.token, "t");
}

#[tokio::test]
async fn test_extractor_prefers_middleware_session() {
    let request = Request::builder()
        .uri("/dashboard")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();
    parts.extensions.insert(Session::mock());

    let session = Session::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(session, Session::mock());
}
