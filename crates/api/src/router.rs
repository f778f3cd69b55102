//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same middleware
//! stack.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use kalamari_core::template::MAX_PARTS;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Per-route request deadlines.
///
/// Ordinary routes answer within `request`. Instantiating a template makes
/// one external call per part, so `POST /event-groups` gets a budget sized
/// for the largest template at the external per-call timeout.
#[derive(Debug, Clone, Copy)]
pub struct RouteTimeouts {
    pub request: Duration,
    pub dispatch: Duration,
}

impl RouteTimeouts {
    pub fn from_config(config: &ServerConfig) -> Self {
        let per_batch = (MAX_PARTS as u64).saturating_mul(config.external_request_timeout_secs);
        Self {
            request: Duration::from_secs(config.request_timeout_secs),
            dispatch: Duration::from_secs(config.request_timeout_secs.saturating_add(per_batch)),
        }
    }

    pub fn request_layer(&self) -> TimeoutLayer {
        TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, self.request)
    }

    pub fn dispatch_layer(&self) -> TimeoutLayer {
        TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, self.dispatch)
    }
}

/// Build the full application [`Router`] with all middleware layers.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Panic recovery (catch panics, return 500)
///
/// Request timeouts are attached per route, see [`RouteTimeouts`].
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");
    let timeouts = RouteTimeouts::from_config(config);

    Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router().layer(timeouts.request_layer()))
        // API v1 routes.
        .nest("/api/v1", routes::api_routes(&timeouts))
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Build the CORS middleware layer from server configuration.
///
/// Panics at startup if any configured origin is invalid.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
