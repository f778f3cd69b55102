use std::sync::Arc;

use kalamari_core::calendar::CalendarService;
use kalamari_db::store::{EventGroupStore, TemplateStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Template persistence.
    pub templates: Arc<dyn TemplateStore>,
    /// Event-group persistence.
    pub event_groups: Arc<dyn EventGroupStore>,
    /// External calendar / task-list service.
    pub calendar: Arc<dyn CalendarService>,
    /// Server configuration (session secret is read by the auth extractors).
    pub config: Arc<ServerConfig>,
}
