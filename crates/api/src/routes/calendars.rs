//! Destination listing routes.
//!
//! ```text
//! GET    /calendars     list_calendars
//! GET    /task-lists    list_task_lists
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::calendars;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendars", get(calendars::list_calendars))
        .route("/task-lists", get(calendars::list_task_lists))
}
