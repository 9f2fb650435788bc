use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::models::Session;

// --- Denial Page ---

/// Inline stylesheet of the denial page. The page must render without any other asset.
const NOT_FOUND_STYLE: &str = r#"
      html, body {
        margin: 0;
        padding: 0;
        font-family: system-ui, sans-serif;
        background: linear-gradient(135deg, #0f2027, #203a43, #2c5364);
        color: white;
        min-height: 100vh;
      }
      main { display: flex; flex-direction: column; min-height: 100vh; }
      .container {
        flex: 1;
        display: flex;
        flex-direction: column;
        justify-content: center;
        align-items: center;
        max-width: 40rem;
        margin: 0 auto;
        text-align: center;
      }
      h1 { font-size: 3rem; font-weight: 800; margin-bottom: 0.5rem; }
      h1 .code { color: #f87171; }
      h1 .text { font-weight: normal; }
      p {
        margin-top: 1rem;
        font-size: 1.125rem;
        color: rgba(255, 255, 255, 0.8);
        line-height: 1.6;
        max-width: 25rem;
      }
      code {
        display: block;
        font-family: monospace;
        background: #203a43;
        color: #d1d5db;
        padding: 0.75rem;
        border: 1px solid #6b7280;
        border-radius: 0.375rem;
        margin-top: 1.5rem;
        max-width: 100%;
        overflow-x: auto;
      }
      .actions { display: flex; justify-content: center; margin-bottom: 6rem; }
      .btn {
        background-color: #2563eb;
        color: white;
        font-weight: 600;
        padding: 0.75rem 2rem;
        border-radius: 0.375rem;
        text-decoration: none;
        box-shadow: 0 2px 6px rgba(0, 0, 0, 0.3);
      }
      .btn:hover { background-color: #1d4ed8; }
"#;

/// not_found_page
///
/// The one document every denial renders, whether the path exists for nobody or only
/// for other roles. Its only inputs are the path and whether the visitor looks logged
/// in, which picks the call to action.
pub fn not_found_page(path: &str, authenticated: bool) -> String {
    let (href, cta) = if authenticated {
        ("/dashboard", "Go to Dashboard")
    } else {
        ("/login", "Go to Login")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Page Not Found</title>
    <style>{style}</style>
  </head>
  <body>
    <main>
      <div class="container">
        <h1><span class="code">404:</span> <span class="text">Not Found</span></h1>
        <p>¡Ups! Parece que estás perdido o no tienes permiso para acceder a esta página.</p>
        <code>Path: {path}</code>
      </div>
      <div class="actions">
        <a href="{href}" class="btn">{cta}</a>
      </div>
    </main>
  </body>
</html>"#,
        style = NOT_FOUND_STYLE,
        path = escape_html(path),
    )
}

/// The full 404 response around [`not_found_page`].
pub fn not_found_response(path: &str, authenticated: bool) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        not_found_page(path, authenticated),
    )
        .into_response()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// --- Page Rendering ---

/// PageRequest
///
/// What the renderer needs from an allowed request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub method: Method,
    /// Path plus query string, exactly as requested.
    pub path_and_query: String,
    /// The browser's `Cookie` header, forwarded so the renderer sees the same session.
    pub cookie: Option<HeaderValue>,
    pub body: Bytes,
}

/// RenderedPage
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for RenderedPage {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// PageRenderer
///
/// Produces the page for a request the access layer has already allowed.
/// `Arc<dyn PageRenderer>` lets the router run against the real SSR upstream or an
/// in-process renderer without knowing which.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, page: PageRequest, session: &Session) -> Result<RenderedPage, StatusCode>;
}

pub type RendererState = Arc<dyn PageRenderer>;

/// Response headers relayed from the upstream renderer.
const RELAYED_HEADERS: [header::HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::LOCATION,
    header::SET_COOKIE,
    header::CACHE_CONTROL,
];

/// UpstreamRenderer
///
/// Forwards allowed requests to the portal's server-side renderer. Redirects are not
/// followed here; they are relayed so the browser sees them.
#[derive(Clone)]
pub struct UpstreamRenderer {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamRenderer {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PageRenderer for UpstreamRenderer {
    async fn render(&self, page: PageRequest, _session: &Session) -> Result<RenderedPage, StatusCode> {
        let url = format!("{}{}", self.base_url, page.path_and_query);

        let mut request = self.http.request(page.method, &url).body(page.body);
        if let Some(cookie) = page.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "Page renderer unreachable");
            StatusCode::BAD_GATEWAY
        })?;

        let status = response.status();
        let mut headers = HeaderMap::new();
        for name in RELAYED_HEADERS {
            for value in response.headers().get_all(&name) {
                headers.append(name.clone(), value.clone());
            }
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "Page renderer response unreadable");
            StatusCode::BAD_GATEWAY
        })?;

        Ok(RenderedPage {
            status,
            headers,
            body,
        })
    }
}

/// StaticRenderer
///
/// In-process stand-in for the SSR renderer: a bare HTML shell naming the page and the
/// visitor's role. Used when no upstream is configured and in tests.
#[derive(Clone, Default)]
pub struct StaticRenderer;

impl StaticRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, page: PageRequest, session: &Session) -> Result<RenderedPage, StatusCode> {
        let path = page
            .path_and_query
            .split('?')
            .next()
            .unwrap_or_default()
            .to_string();

        let role = session
            .role()
            .map(|role| role.label().to_string())
            .unwrap_or_else(|| "Invitado".to_string());

        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"es\">\n  <head><meta charset=\"UTF-8\" /><title>{path}</title></head>\n  <body data-page=\"{path}\" data-role=\"{role}\"><h1>{path}</h1><p>{role}</p></body>\n</html>",
            path = escape_html(&path),
            role = escape_html(&role),
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );

        Ok(RenderedPage {
            status: StatusCode::OK,
            headers,
            body: Bytes::from(body),
        })
    }
}
