//! Boundary to the external calendar / task-list service.
//!
//! [`CalendarService`] is implemented by the Google client in
//! `kalamari-google` and by scripted fakes in tests. Every call carries the
//! acting user's provider access token; implementations hold no per-user
//! state.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schedule::{ItemSpec, ItemTiming};
use crate::types::{ItemKind, Timestamp};

/// A calendar or task list the user can create items in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationContainer {
    pub id: String,
    /// Display name.
    pub summary: String,
}

/// Errors from a single call to the external service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The access token was rejected (HTTP 401/403).
    #[error("Calendar service rejected the access token ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// The destination container (or another addressed resource) is absent.
    #[error("Calendar resource not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response (rate limits, bad requests, 5xx).
    #[error("Calendar service error ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("Calendar request failed: {0}")]
    Transport(String),

    /// The service answered 2xx but did not return an item id.
    #[error("Calendar service returned no id for the created item")]
    MissingId,
}

impl CalendarError {
    /// Whether the failure invalidates the credential for every further call.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, CalendarError::Unauthorized { .. })
    }
}

impl From<CalendarError> for CoreError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::Unauthorized { .. } => {
                CoreError::Unauthorized("Calendar access token was rejected".into())
            }
            CalendarError::NotFound(what) => CoreError::NotFound {
                entity: "Destination",
                id: what,
            },
            other => CoreError::ExternalService(other.to_string()),
        }
    }
}

/// Remote calendar / task API.
#[async_trait::async_trait]
pub trait CalendarService: Send + Sync {
    /// Create a span item (calendar event) and return its id.
    async fn create_span_item(
        &self,
        access_token: &str,
        calendar_id: &str,
        title: &str,
        notes: Option<&str>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<String, CalendarError>;

    /// Create a point item (task) due on `due`'s UTC date and return its id.
    async fn create_point_item(
        &self,
        access_token: &str,
        task_list_id: &str,
        title: &str,
        notes: Option<&str>,
        due: Timestamp,
    ) -> Result<String, CalendarError>;

    /// List the containers of the given kind (calendars or task lists).
    async fn list_containers(
        &self,
        access_token: &str,
        kind: ItemKind,
    ) -> Result<Vec<DestinationContainer>, CalendarError>;
}

/// Submit one expanded spec through the matching creation call.
pub async fn submit_item(
    service: &dyn CalendarService,
    access_token: &str,
    destination_id: &str,
    spec: &ItemSpec,
) -> Result<String, CalendarError> {
    match spec.timing {
        ItemTiming::Span { start, end } => {
            service
                .create_span_item(
                    access_token,
                    destination_id,
                    &spec.title,
                    spec.description.as_deref(),
                    start,
                    end,
                )
                .await
        }
        ItemTiming::Point { due } => {
            service
                .create_point_item(
                    access_token,
                    destination_id,
                    &spec.title,
                    spec.description.as_deref(),
                    due,
                )
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn only_unauthorized_is_an_auth_failure() {
        assert!(CalendarError::Unauthorized {
            status: 401,
            body: String::new()
        }
        .is_auth_failure());
        assert!(!CalendarError::NotFound("cal".into()).is_auth_failure());
        assert!(!CalendarError::Rejected {
            status: 429,
            body: "slow down".into()
        }
        .is_auth_failure());
        assert!(!CalendarError::Transport("reset".into()).is_auth_failure());
        assert!(!CalendarError::MissingId.is_auth_failure());
    }

    #[test]
    fn calendar_errors_map_onto_core_taxonomy() {
        let unauthorized = CalendarError::Unauthorized {
            status: 403,
            body: "denied".into(),
        };
        assert_matches!(CoreError::from(unauthorized), CoreError::Unauthorized(_));
        assert_matches!(
            CoreError::from(CalendarError::NotFound("primary".into())),
            CoreError::NotFound { entity: "Destination", .. }
        );
        assert_matches!(
            CoreError::from(CalendarError::Rejected {
                status: 500,
                body: "boom".into()
            }),
            CoreError::ExternalService(msg) if msg.contains("500")
        );
    }
}
