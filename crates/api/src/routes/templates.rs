//! Route definitions for templates, mounted at `/templates`.
//!
//! ```text
//! GET    /          list_templates
//! POST   /          create_template
//! GET    /{id}      get_template
//! PUT    /{id}      update_template
//! DELETE /{id}      delete_template
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
}
