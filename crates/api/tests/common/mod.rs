#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use kalamari_api::auth::jwt::{generate_session_token, JwtConfig};
use kalamari_api::config::{ServerConfig, StoreBackend};
use kalamari_api::router::build_app_router;
use kalamari_api::state::AppState;
use kalamari_core::calendar::{CalendarError, CalendarService, DestinationContainer};
use kalamari_core::types::{ItemKind, Timestamp};
use kalamari_db::memory::{MemoryEventGroupStore, MemoryTemplateStore};

pub const ANN: &str = "ann@example.com";
pub const BOB: &str = "bob@example.com";
pub const ACCESS_TOKEN: &str = "ya29.test-access-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        store_backend: StoreBackend::Memory,
        google_calendar_api_url: "http://calendar.invalid".to_string(),
        google_tasks_api_url: "http://tasks.invalid".to_string(),
        external_request_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_expiry_mins: 60,
        },
    }
}

// ---------------------------------------------------------------------------
// Fake calendar service
// ---------------------------------------------------------------------------

/// One creation call observed by [`FakeCalendar`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub access_token: String,
    pub destination_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub kind: ItemKind,
    /// Start for events, due for tasks.
    pub start: Timestamp,
    /// `None` for tasks.
    pub end: Option<Timestamp>,
}

/// Scripted [`CalendarService`]. Creation calls consume queued replies in
/// order; once the queue is empty every call succeeds with `item-N`.
#[derive(Default)]
pub struct FakeCalendar {
    replies: Mutex<VecDeque<Result<String, CalendarError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    list_error: Mutex<Option<CalendarError>>,
    create_delay: Mutex<Option<Duration>>,
}

impl FakeCalendar {
    pub fn push_reply(&self, reply: Result<String, CalendarError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn fail_listing_with(&self, err: CalendarError) {
        *self.list_error.lock().unwrap() = Some(err);
    }

    /// Make every creation call take `delay` before it answers.
    pub fn slow_creates(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn pause(&self) {
        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn record(&self, call: RecordedCall) -> Result<String, CalendarError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        let n = calls.len();
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("item-{n}")))
    }
}

#[async_trait]
impl CalendarService for FakeCalendar {
    async fn create_span_item(
        &self,
        access_token: &str,
        calendar_id: &str,
        title: &str,
        notes: Option<&str>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<String, CalendarError> {
        self.pause().await;
        self.record(RecordedCall {
            access_token: access_token.to_string(),
            destination_id: calendar_id.to_string(),
            title: title.to_string(),
            notes: notes.map(str::to_string),
            kind: ItemKind::Event,
            start,
            end: Some(end),
        })
    }

    async fn create_point_item(
        &self,
        access_token: &str,
        task_list_id: &str,
        title: &str,
        notes: Option<&str>,
        due: Timestamp,
    ) -> Result<String, CalendarError> {
        self.pause().await;
        self.record(RecordedCall {
            access_token: access_token.to_string(),
            destination_id: task_list_id.to_string(),
            title: title.to_string(),
            notes: notes.map(str::to_string),
            kind: ItemKind::Task,
            start: due,
            end: None,
        })
    }

    async fn list_containers(
        &self,
        _access_token: &str,
        kind: ItemKind,
    ) -> Result<Vec<DestinationContainer>, CalendarError> {
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(match kind {
            ItemKind::Event => vec![
                DestinationContainer {
                    id: "primary".into(),
                    summary: "ann@example.com".into(),
                },
                DestinationContainer {
                    id: "family@group.calendar.google.com".into(),
                    summary: "Family".into(),
                },
            ],
            ItemKind::Task => vec![DestinationContainer {
                id: "MTIz".into(),
                summary: "My Tasks".into(),
            }],
        })
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The full router over fresh in-memory stores, plus a handle on the fake
/// calendar behind it.
pub struct TestApp {
    pub router: Router,
    pub calendar: Arc<FakeCalendar>,
    pub config: ServerConfig,
}

/// Build the full application router with all middleware layers, backed by
/// in-memory stores and a [`FakeCalendar`].
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

/// Like [`build_test_app`], with a caller-supplied configuration.
pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let calendar = Arc::new(FakeCalendar::default());

    let state = AppState {
        templates: Arc::new(MemoryTemplateStore::new()),
        event_groups: Arc::new(MemoryEventGroupStore::new()),
        calendar: calendar.clone(),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        calendar,
        config,
    }
}

impl TestApp {
    /// A session for `user` that carries a provider access token.
    pub fn token(&self, user: &str) -> String {
        generate_session_token(user, Some(ACCESS_TOKEN), &self.config.jwt).unwrap()
    }

    /// A session for `user` without calendar access.
    pub fn token_without_calendar(&self, user: &str) -> String {
        generate_session_token(user, None, &self.config.jwt).unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post_json(&self, uri: &str, token: &str, body: serde_json::Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, token: &str, body: serde_json::Value) -> Response<Body> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a template for `user` and return its JSON.
    pub async fn create_template(&self, user: &str, body: serde_json::Value) -> serde_json::Value {
        let response = self.post_json("/api/v1/templates", &self.token(user), body).await;
        assert_eq!(response.status(), 201, "template creation failed");
        body_json(response).await
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The haircut template: book a day ahead, then the appointment itself.
pub fn haircut_template() -> serde_json::Value {
    serde_json::json!({
        "name": "Haircut",
        "description": "Monthly trim",
        "color": "#10b981",
        "defaultCalendarId": "primary",
        "parts": [
            {"id": "book", "title": "Book", "offsetMinutes": -1440, "durationMinutes": 30,
             "description": "Call the salon"},
            {"id": "cut", "title": "Haircut", "offsetMinutes": 0, "durationMinutes": 60}
        ]
    })
}
