#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::{Form, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use coachgpt_server::server::{
    models::CredentialRecord,
    router,
    services::{CredentialStore, MemoryStore, StoreError},
    AppState, Configuration,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const CLIENT_ID: &str = "12345";
pub const CLIENT_SECRET: &str = "test-secret";

/// Token exchange codes understood by the stub.
pub const CODE_WITHOUT_EMAIL: &str = "code-no-email";
pub const CODE_WITH_EMAIL: &str = "code-with-email";
pub const CODE_INVALID: &str = "code-invalid";

/// Access tokens understood by the stub activity endpoint.
pub const TOKEN_FIVE_ACTIVITIES: &str = "token-five";
pub const TOKEN_TWO_ACTIVITIES: &str = "token-two";
pub const TOKEN_NO_ACTIVITIES: &str = "token-empty";
/// One full activity followed by one without `name` or `start_date`.
pub const TOKEN_SPARSE_ACTIVITIES: &str = "token-sparse";
pub const TOKEN_REVOKED: &str = "token-revoked";

#[derive(Debug, Clone)]
pub struct ActivityCall {
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct StubState {
    token_calls: Arc<AtomicUsize>,
    activity_calls: Arc<Mutex<Vec<ActivityCall>>>,
}

/// Strava stand-in served on an ephemeral local port.
pub struct StubStrava {
    pub addr: SocketAddr,
    state: StubState,
}

impl StubStrava {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/api/v3/athlete/activities", get(activities))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn activity_calls(&self) -> Vec<ActivityCall> {
        self.state.activity_calls.lock().unwrap().clone()
    }
}

fn fault(resource: &str, field: &str) -> Value {
    json!({
        "message": "Authorization Error",
        "errors": [{ "resource": resource, "field": field, "code": "invalid" }]
    })
}

async fn token(
    State(state): State<StubState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let exchange = state.token_calls.fetch_add(1, Ordering::SeqCst) + 1;

    let field = |name: &str| form.get(name).map(String::as_str);
    if field("client_id") != Some(CLIENT_ID)
        || field("client_secret") != Some(CLIENT_SECRET)
        || field("grant_type") != Some("authorization_code")
    {
        return (StatusCode::UNAUTHORIZED, Json(fault("Application", "client_id"))).into_response();
    }

    let athlete = match field("code") {
        Some(CODE_WITHOUT_EMAIL) => json!({ "id": 42, "firstname": "Marianne", "lastname": "T." }),
        Some(CODE_WITH_EMAIL) => {
            json!({ "id": 7, "firstname": "Rui", "email": "runner@example.com" })
        }
        _ => {
            return (StatusCode::BAD_REQUEST, Json(fault("AuthorizationCode", "code")))
                .into_response()
        }
    };

    Json(json!({
        "token_type": "Bearer",
        "expires_at": 1_900_000_000 + exchange,
        "expires_in": 21600,
        "refresh_token": format!("refresh-{}", exchange),
        "access_token": format!("access-{}", exchange),
        "athlete": athlete,
    }))
    .into_response()
}

fn sample_activity(index: usize) -> Value {
    json!({
        "resource_state": 2,
        "id": 1000 + index,
        "athlete": { "id": 42, "resource_state": 1 },
        "name": format!("Run {}", index),
        "distance": 5000.0 + index as f64,
        "moving_time": 1500 + index,
        "elapsed_time": 1600 + index,
        "total_elevation_gain": 12.5,
        "sport_type": "Run",
        "start_date": format!("2024-06-0{}T06:30:00Z", index + 1),
        "start_date_local": format!("2024-06-0{}T08:30:00Z", index + 1),
        "kudos_count": 0
    })
}

async fn activities(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    state.activity_calls.lock().unwrap().push(ActivityCall {
        authorization: authorization.clone(),
        query: query.clone(),
    });

    let per_page = query
        .get("per_page")
        .and_then(|value| value.parse().ok())
        .unwrap_or(30usize);

    let token = authorization.as_deref().and_then(|v| v.strip_prefix("Bearer "));
    if token == Some(TOKEN_SPARSE_ACTIVITIES) {
        let sparse = json!({ "id": 2000, "distance": 800.0, "moving_time": 240 });
        return Json(json!([sample_activity(0), sparse])).into_response();
    }

    let available = match token {
        Some(TOKEN_FIVE_ACTIVITIES) => 5,
        Some(TOKEN_TWO_ACTIVITIES) => 2,
        Some(TOKEN_NO_ACTIVITIES) => 0,
        _ => {
            return (StatusCode::UNAUTHORIZED, Json(fault("Athlete", "access_token")))
                .into_response()
        }
    };

    let page: Vec<Value> = (0..available.min(per_page)).map(sample_activity).collect();
    Json(Value::Array(page)).into_response()
}

/// Memory store that counts calls, to assert which paths touch the store.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    upserts: AtomicUsize,
    lookups: AtomicUsize,
}

impl CountingStore {
    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub async fn seed(&self, email: &str, access_token: &str) {
        self.inner
            .upsert(&CredentialRecord {
                email: email.to_string(),
                access_token: access_token.to_string(),
                refresh_token: "refresh".to_string(),
                expires_at: 1_900_000_000,
            })
            .await
            .unwrap();
    }
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn upsert(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(record).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_email(email).await
    }
}

/// Store whose every call fails, as an unreachable Supabase would.
pub struct FailingStore;

#[async_trait]
impl CredentialStore for FailingStore {
    async fn upsert(&self, _record: &CredentialRecord) -> Result<(), StoreError> {
        Err(StoreError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "unavailable".to_string(),
        })
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Err(StoreError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "unavailable".to_string(),
        })
    }
}

pub fn test_configuration(stub: &StubStrava) -> Configuration {
    let toml = format!(
        r#"
        [strava]
        client_id = "{client_id}"
        client_secret = "{client_secret}"
        token_url = "http://{addr}/oauth/token"
        api_base_url = "http://{addr}/api/v3"

        [store]
        backend = "memory"
        "#,
        client_id = CLIENT_ID,
        client_secret = CLIENT_SECRET,
        addr = stub.addr,
    );
    let config = config::Config::builder()
        .add_source(config::File::from_str(&toml, config::FileFormat::Toml))
        .build()
        .unwrap();
    Configuration::from_config(config).unwrap()
}

pub fn build_test_app(stub: &StubStrava, store: Arc<dyn CredentialStore>) -> Router {
    let state = AppState::with_store(&test_configuration(stub), store).unwrap();
    router(state)
}

pub async fn get_request(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let res = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let headers = res.headers().clone();
    let body = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    (status, headers, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get_request(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = get_request(app, uri).await;
    (status, String::from_utf8(body).unwrap())
}
