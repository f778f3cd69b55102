pub mod calendars;
pub mod event_groups;
pub mod health;
pub mod templates;

use axum::Router;

use crate::router::RouteTimeouts;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                     list, create
/// /templates/{id}                get, update, delete
///
/// /event-groups                  list, create (instantiate a template)
/// /event-groups/{id}             get
///
/// /calendars                     list calendars
/// /task-lists                    list task lists
/// ```
///
/// Every route runs under the ordinary request timeout except
/// `POST /event-groups`, which gets the dispatch budget.
pub fn api_routes(timeouts: &RouteTimeouts) -> Router<AppState> {
    Router::new()
        .nest(
            "/templates",
            templates::router().layer(timeouts.request_layer()),
        )
        .nest("/event-groups", event_groups::router(timeouts))
        .merge(calendars::router().layer(timeouts.request_layer()))
}
