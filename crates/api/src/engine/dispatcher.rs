//! Event-group dispatcher.
//!
//! Loads a template, expands it against an anchor and submits every item to
//! the calendar service one at a time. Items that fail are skipped; the
//! event group records only the ids that were actually created, in
//! submission order. Nothing is retried or rolled back.

use std::sync::Arc;

use kalamari_core::calendar::{submit_item, CalendarError, CalendarService};
use kalamari_core::error::CoreError;
use kalamari_core::schedule::{self, ItemSpec};
use kalamari_core::types::{EntityId, ItemKind, Timestamp};
use kalamari_db::models::event_group::{EventGroup, NewEventGroup};
use kalamari_db::store::{EventGroupStore, TemplateStore};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// One "create items from this template" request.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub template_id: EntityId,
    pub anchor: Timestamp,
    /// Calendar id for events, task-list id for tasks.
    pub destination_id: String,
    pub kind: ItemKind,
    pub user_id: String,
    pub access_token: String,
}

/// Instantiates templates into event groups.
///
/// 1. Load the template and check ownership.
/// 2. Expand the parts against the anchor.
/// 3. Submit each item sequentially, skipping failures.
/// 4. Persist the event group with the ids that came back.
pub struct EventGroupDispatcher {
    templates: Arc<dyn TemplateStore>,
    event_groups: Arc<dyn EventGroupStore>,
    calendar: Arc<dyn CalendarService>,
}

impl EventGroupDispatcher {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        event_groups: Arc<dyn EventGroupStore>,
        calendar: Arc<dyn CalendarService>,
    ) -> Self {
        Self {
            templates,
            event_groups,
            calendar,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.templates),
            Arc::clone(&state.event_groups),
            Arc::clone(&state.calendar),
        )
    }

    /// Run one dispatch.
    ///
    /// Returns the persisted group on full or partial success. If the
    /// calendar service rejects the access token, the loop stops and
    /// [`AppError::BatchAborted`] reports the ids created so far (a group is
    /// still recorded for them when there is at least one).
    pub async fn dispatch(&self, req: DispatchRequest) -> AppResult<EventGroup> {
        if req.destination_id.trim().is_empty() {
            return Err(CoreError::Validation("calendarId must not be empty".into()).into());
        }

        // 1. Load template.
        let template = self
            .templates
            .find_by_id(req.template_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Template", req.template_id))?;
        if template.user_id != req.user_id {
            return Err(CoreError::Forbidden("Template belongs to another user".into()).into());
        }

        // 2. Expand. Fails before any external call.
        let specs = schedule::expand(req.anchor, &template.parts, req.kind)?;

        // 3. Submit sequentially.
        let (event_ids, aborted) = self.submit_all(&req, &specs).await;

        tracing::info!(
            template_id = %template.id,
            kind = %req.kind,
            requested = specs.len(),
            created = event_ids.len(),
            aborted,
            "Template dispatched"
        );

        // 4. Persist.
        let new_group = NewEventGroup {
            user_id: req.user_id.clone(),
            template_id: template.id,
            template_name: template.name.clone(),
            anchor_date: req.anchor,
            calendar_id: req.destination_id.clone(),
            item_kind: req.kind,
            event_ids,
        };

        if aborted {
            let event_group_id = if new_group.event_ids.is_empty() {
                None
            } else {
                Some(self.record(new_group.clone()).await?.id)
            };
            return Err(AppError::BatchAborted {
                event_ids: new_group.event_ids,
                event_group_id,
            });
        }

        self.record(new_group).await
    }

    /// Store the group. On failure the created ids are logged and handed
    /// back in the error so they stay traceable.
    async fn record(&self, new_group: NewEventGroup) -> AppResult<EventGroup> {
        match self.event_groups.create(&new_group).await {
            Ok(group) => Ok(group),
            Err(source) => {
                tracing::error!(
                    template_id = %new_group.template_id,
                    event_ids = ?new_group.event_ids,
                    error = %source,
                    "Failed to record event group"
                );
                Err(AppError::GroupNotRecorded {
                    event_ids: new_group.event_ids,
                    source,
                })
            }
        }
    }

    /// Submit `specs` one by one. Returns the created ids in order and
    /// whether the loop stopped on an authorization failure.
    async fn submit_all(&self, req: &DispatchRequest, specs: &[ItemSpec]) -> (Vec<String>, bool) {
        let mut outcomes: Vec<Result<String, CalendarError>> = Vec::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            let outcome = submit_item(
                self.calendar.as_ref(),
                &req.access_token,
                &req.destination_id,
                spec,
            )
            .await;

            let auth_failed = match &outcome {
                Ok(id) => {
                    tracing::debug!(part = index + 1, item_id = %id, "Item created");
                    false
                }
                Err(err) if err.is_auth_failure() => {
                    tracing::warn!(part = index + 1, error = %err, "Calendar authorization failed, stopping batch");
                    true
                }
                Err(err) => {
                    tracing::warn!(part = index + 1, title = %spec.title, error = %err, "Item creation failed, skipping");
                    false
                }
            };

            outcomes.push(outcome);
            if auth_failed {
                let ids = outcomes.into_iter().filter_map(Result::ok).collect();
                return (ids, true);
            }
        }

        (outcomes.into_iter().filter_map(Result::ok).collect(), false)
    }
}
