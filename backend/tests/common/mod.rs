use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use travel_portal::{
    AccessControl, AppConfig, AppState, RouteTable, Session, StaticRenderer,
    api_client::{ApiError, ApiRequest, BackendApi},
    create_router,
};

// --- Mock Backend ---

/// Records every call and answers with a canned result.
#[allow(dead_code)]
pub struct MockBackend {
    pub calls: Mutex<Vec<(ApiRequest, Option<Session>)>>,
    pub reply: Box<dyn Fn() -> Result<Value, ApiError> + Send + Sync>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Box::new(|| Ok(serde_json::json!({ "ok": true }))),
        }
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn request(&self, request: ApiRequest, session: Option<&Session>) -> Result<Value, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((request, session.cloned()));
        (self.reply)()
    }
}

// --- State & Router ---

#[allow(dead_code)]
pub fn test_state(dev_bypass: bool) -> AppState {
    test_state_with_backend(dev_bypass, Arc::new(MockBackend::default()))
}

#[allow(dead_code)]
pub fn test_state_with_backend(dev_bypass: bool, backend: Arc<MockBackend>) -> AppState {
    let config = AppConfig {
        dev_bypass,
        ..AppConfig::default()
    };

    AppState {
        access: Arc::new(AccessControl::new(
            Arc::new(RouteTable::standard()),
            dev_bypass,
        )),
        api: backend as Arc<dyn BackendApi>,
        renderer: Arc::new(StaticRenderer::new()),
        config,
    }
}

#[allow(dead_code)]
pub fn test_router(dev_bypass: bool) -> Router {
    create_router(test_state(dev_bypass))
}

// --- Request Helpers ---

#[allow(dead_code)]
pub async fn get(app: Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}
