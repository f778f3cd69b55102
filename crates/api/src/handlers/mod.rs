pub mod calendars;
pub mod event_groups;
pub mod templates;

use kalamari_core::error::CoreError;
use kalamari_core::types::EntityId;

/// Parse a path id. A malformed id cannot name an existing record, so it is
/// reported as not found.
pub(crate) fn parse_entity_id(entity: &'static str, raw: &str) -> Result<EntityId, CoreError> {
    raw.parse::<EntityId>()
        .map_err(|_| CoreError::not_found(entity, raw))
}
