//! Route definitions for event groups, mounted at `/event-groups`.
//!
//! ```text
//! GET    /          list_event_groups
//! POST   /          create_event_group
//! GET    /{id}      get_event_group
//! ```
//!
//! Timeouts are attached per handler: creation runs a whole batch of
//! external calls and gets the longer dispatch budget.

use axum::handler::Handler;
use axum::routing::get;
use axum::Router;

use crate::handlers::event_groups;
use crate::router::RouteTimeouts;
use crate::state::AppState;

pub fn router(timeouts: &RouteTimeouts) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(event_groups::list_event_groups.layer(timeouts.request_layer()))
                .post(event_groups::create_event_group.layer(timeouts.dispatch_layer())),
        )
        .route(
            "/{id}",
            get(event_groups::get_event_group.layer(timeouts.request_layer())),
        )
}
