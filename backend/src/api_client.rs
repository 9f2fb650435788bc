use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::models::Session;

/// ApiError
///
/// Failures surfaced by the backend client. A non-2xx answer keeps both the status and
/// the body the backend sent, so callers can relay it untouched.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("backend answered {status}")]
    Status { status: StatusCode, body: Value },
    #[error("backend unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request header `{0}`")]
    InvalidHeader(String),
}

/// ApiRequest
///
/// One call against the backend API. `path` is appended verbatim to the base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path, Some(body))
    }

    /// Extra header; applied after the defaults, so it can replace them.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// BackendApi
///
/// The contract the portal uses to reach the travel backend. The bearer token always
/// comes from the session handed in by the caller, never from ambient state.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn request(&self, request: ApiRequest, session: Option<&Session>) -> Result<Value, ApiError>;
}

pub type ApiState = Arc<dyn BackendApi>;

/// request_as
///
/// Runs `request` and decodes the answer into `T`.
pub async fn request_as<T: DeserializeOwned>(
    api: &dyn BackendApi,
    request: ApiRequest,
    session: Option<&Session>,
) -> Result<T, ApiError> {
    let value = api.request(request, session).await?;
    Ok(serde_json::from_value(value)?)
}

/// HttpApiClient
///
/// `reqwest`-backed implementation. Request and response bodies are JSON; a response
/// that is not valid JSON is handed back as a JSON string holding the raw text.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    /// new
    ///
    /// `accept_invalid_certs` exists for local backends behind self-signed certificates.
    /// It must stay off in production.
    pub fn new(base_url: &str, accept_invalid_certs: bool) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers_for(request: &ApiRequest, session: Option<&Session>) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = session.map(|s| s.token.as_str()).filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::InvalidHeader(header::AUTHORIZATION.as_str().to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

/// JSON if it parses, the raw text otherwise.
fn parse_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl BackendApi for HttpApiClient {
    async fn request(&self, request: ApiRequest, session: Option<&Session>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let headers = Self::headers_for(&request, session)?;

        let mut builder = self.http.request(request.method.clone(), &url).headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, method = %request.method, url = %url, "API request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "error": text }));
            tracing::warn!(status = %status, method = %request.method, url = %url, "Backend rejected request");
            return Err(ApiError::Status { status, body });
        }

        Ok(parse_body(text))
    }
}
