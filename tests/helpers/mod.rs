//! Test helper utilities: an in-process relay and a recording fake provider

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agent_photo::app_state::AppState;
use agent_photo::routes;
use agent_photo::services::auth::{Capability, SessionVerifier};
use agent_photo::services::encryption::SecretBox;
use agent_photo::services::store::MemoryStore;
use agent_photo::services::vision::VisionClient;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const SESSION_SECRET: &str = "test-session-secret";
pub const API_ROOT: &str = "/wp-json";
pub const PROCESS_PATH: &str = "/wp-json/agent-photo/v1/process";
pub const SETTINGS_PATH: &str = "/wp-json/agent-photo/v1/settings";
pub const TEST_API_KEY: &str = "sk-test-0123456789";

/// One canned provider answer.
#[derive(Clone)]
pub struct ProviderReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl ProviderReply {
    pub fn ok(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: None,
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }
}

#[derive(Clone, Default)]
struct ProviderState {
    replies: Arc<Mutex<VecDeque<ProviderReply>>>,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

/// Local stand-in for the chat-completion endpoint. Replies are served in
/// order; the last one repeats.
pub struct FakeProvider {
    pub endpoint: String,
    state: ProviderState,
}

impl FakeProvider {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(HeaderMap, Value)> {
        self.state.requests.lock().unwrap().last().cloned()
    }
}

async fn completions(
    State(state): State<ProviderState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push((headers, body));

    let reply = {
        let mut replies = state.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    };

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    (reply.status, reply.body)
}

pub async fn spawn_provider(replies: Vec<ProviderReply>) -> FakeProvider {
    let state = ProviderState {
        replies: Arc::new(Mutex::new(replies.into())),
        ..Default::default()
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeProvider {
        endpoint: format!("http://{addr}/v1/chat/completions"),
        state,
    }
}

/// A relay wired to in-memory storage.
pub struct TestRelay {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub fn test_encryption_key() -> String {
    base64::engine::general_purpose::STANDARD.encode([9u8; 32])
}

pub async fn build_relay(provider_endpoint: &str, api_key: Option<&str>) -> TestRelay {
    build_relay_with_timeout(provider_endpoint, api_key, Duration::from_secs(30)).await
}

pub async fn build_relay_with_timeout(
    provider_endpoint: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> TestRelay {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        SecretBox::new(&test_encryption_key()).unwrap(),
        VisionClient::new(provider_endpoint, timeout).unwrap(),
        SessionVerifier::new(SESSION_SECRET),
    );

    if let Some(key) = api_key {
        state.settings.set_api_key(key).await.unwrap();
    }

    TestRelay {
        app: routes::router(state.clone(), API_ROOT),
        state,
        store,
    }
}

pub fn token_with(capabilities: &[Capability]) -> String {
    SessionVerifier::new(SESSION_SECRET)
        .issue("test-user", capabilities, chrono::Duration::minutes(10))
        .unwrap()
}

/// Token listing raw capability names, as the host editor issues them.
pub fn token_with_names(names: &[&str]) -> String {
    let claims = agent_photo::services::auth::SessionClaims {
        sub: "test-user".to_string(),
        caps: names.iter().map(|name| name.to_string()).collect(),
        exp: (chrono::Utc::now() + chrono::Duration::minutes(10)).timestamp() as usize,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SESSION_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn editor_token() -> String {
    token_with(&[Capability::EditPosts])
}

pub fn admin_token() -> String {
    token_with(&[Capability::EditPosts, Capability::ManageOptions])
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(body.map(Body::from).unwrap_or_else(Body::empty)).unwrap();

    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::POST, uri, token, Some(body.to_string())).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
