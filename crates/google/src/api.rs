//! REST client for the Google Calendar and Google Tasks endpoints.
//!
//! Wraps event insertion, task insertion and container listing using
//! [`reqwest`]. The client is shared across users; each call is authorized
//! with the caller's OAuth access token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use kalamari_core::calendar::{CalendarError, CalendarService, DestinationContainer};
use kalamari_core::schedule::{format_due, format_instant};
use kalamari_core::types::{ItemKind, Timestamp};

use crate::wire::{
    CalendarListEntry, CreatedResource, EventDateTime, EventInsert, ListResponse, TaskInsert,
    TaskListEntry,
};

/// Production base URL of the Calendar v3 API.
pub const DEFAULT_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Production base URL of the Tasks v1 API.
pub const DEFAULT_TASKS_API_URL: &str = "https://tasks.googleapis.com/tasks/v1";

/// Page size for task-list listing.
const TASK_LISTS_PAGE_SIZE: &str = "100";

/// Longest response body kept in error values.
const MAX_ERROR_BODY_LEN: usize = 1024;

/// HTTP client for the Google Calendar and Tasks APIs.
#[derive(Clone)]
pub struct GoogleCalendarApi {
    client: reqwest::Client,
    calendar_api_url: String,
    tasks_api_url: String,
}

impl GoogleCalendarApi {
    /// Create a client with its own connection pool and request timeout.
    pub fn new(
        calendar_api_url: String,
        tasks_api_url: String,
        timeout: Duration,
    ) -> Result<Self, CalendarError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CalendarError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, calendar_api_url, tasks_api_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        calendar_api_url: String,
        tasks_api_url: String,
    ) -> Self {
        Self {
            client,
            calendar_api_url,
            tasks_api_url,
        }
    }

    // ---- private helpers ----

    /// Append percent-encoded path segments to a base URL. Calendar ids
    /// contain `@` and `#`, so they cannot be spliced in with `format!`.
    fn endpoint(base: &str, segments: &[&str]) -> Result<Url, CalendarError> {
        let mut url = Url::parse(base)
            .map_err(|e| CalendarError::Transport(format!("Invalid API base URL '{base}': {e}")))?;
        url.path_segments_mut()
            .map_err(|()| CalendarError::Transport(format!("API base URL '{base}' cannot be a base")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Map a non-success status onto [`CalendarError`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CalendarError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        if body.len() > MAX_ERROR_BODY_LEN {
            let mut cut = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CalendarError::Unauthorized {
                status: status.as_u16(),
                body,
            },
            StatusCode::NOT_FOUND => CalendarError::NotFound(body),
            _ => CalendarError::Rejected {
                status: status.as_u16(),
                body,
            },
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CalendarError::Transport(format!("Malformed response body: {e}")))
    }

    /// POST a JSON body and return the `id` of the created resource.
    async fn insert<B: serde::Serialize + ?Sized>(
        &self,
        access_token: &str,
        url: Url,
        body: &B,
    ) -> Result<String, CalendarError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let created: CreatedResource = Self::parse_response(response).await?;
        created
            .id
            .filter(|id| !id.is_empty())
            .ok_or(CalendarError::MissingId)
    }

    async fn list<T, Q>(
        &self,
        access_token: &str,
        url: Url,
        query: &Q,
    ) -> Result<Vec<DestinationContainer>, CalendarError>
    where
        T: DeserializeOwned + Into<DestinationContainer>,
        Q: serde::Serialize + ?Sized,
    {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let list: ListResponse<T> = Self::parse_response(response).await?;
        Ok(list.items.into_iter().map(Into::into).collect())
    }
}

fn transport(err: reqwest::Error) -> CalendarError {
    CalendarError::Transport(err.to_string())
}

#[async_trait]
impl CalendarService for GoogleCalendarApi {
    async fn create_span_item(
        &self,
        access_token: &str,
        calendar_id: &str,
        title: &str,
        notes: Option<&str>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<String, CalendarError> {
        let url = Self::endpoint(&self.calendar_api_url, &["calendars", calendar_id, "events"])?;
        let body = EventInsert {
            summary: title,
            description: notes,
            start: EventDateTime {
                date_time: format_instant(start),
            },
            end: EventDateTime {
                date_time: format_instant(end),
            },
        };
        let id = self.insert(access_token, url, &body).await?;
        tracing::debug!(calendar_id, event_id = %id, "Calendar event created");
        Ok(id)
    }

    async fn create_point_item(
        &self,
        access_token: &str,
        task_list_id: &str,
        title: &str,
        notes: Option<&str>,
        due: Timestamp,
    ) -> Result<String, CalendarError> {
        let url = Self::endpoint(&self.tasks_api_url, &["lists", task_list_id, "tasks"])?;
        let body = TaskInsert {
            title,
            notes,
            due: format_due(due),
        };
        let id = self.insert(access_token, url, &body).await?;
        tracing::debug!(task_list_id, task_id = %id, "Task created");
        Ok(id)
    }

    async fn list_containers(
        &self,
        access_token: &str,
        kind: ItemKind,
    ) -> Result<Vec<DestinationContainer>, CalendarError> {
        match kind {
            ItemKind::Event => {
                let url =
                    Self::endpoint(&self.calendar_api_url, &["users", "me", "calendarList"])?;
                self.list::<CalendarListEntry, [(&str, &str)]>(access_token, url, &[])
                    .await
            }
            ItemKind::Task => {
                let url = Self::endpoint(&self.tasks_api_url, &["users", "@me", "lists"])?;
                self.list::<TaskListEntry, _>(
                    access_token,
                    url,
                    &[("maxResults", TASK_LISTS_PAGE_SIZE)],
                )
                .await
            }
        }
    }
}
