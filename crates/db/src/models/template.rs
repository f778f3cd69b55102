//! Template model and DTOs.

use kalamari_core::error::CoreError;
use kalamari_core::template::{
    build_parts, validate_description, validate_template_name, TemplatePart, TemplatePartInput,
    DEFAULT_COLOR,
};
use kalamari_core::types::{EntityId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum length for the color hint.
const MAX_COLOR_LEN: usize = 32;

/// A row from the `templates` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: EntityId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub default_calendar_id: Option<String>,
    #[sqlx(json)]
    pub parts: Vec<TemplatePart>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for both `POST /templates` and `PUT /templates/{id}`.
///
/// Updates replace every mutable field, so create and update share one
/// shape. Unknown fields are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub default_calendar_id: Option<String>,
    pub parts: Vec<TemplatePartInput>,
}

/// Validated mutable fields of a template, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateFields {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub default_calendar_id: Option<String>,
    pub parts: Vec<TemplatePart>,
}

impl TemplateInput {
    /// Validate the input and resolve defaults (color, part ids).
    pub fn into_fields(self) -> Result<TemplateFields, CoreError> {
        validate_template_name(&self.name)?;
        validate_description(self.description.as_deref())?;

        let color = match self.color.map(|c| c.trim().to_string()) {
            Some(c) if !c.is_empty() => c,
            _ => DEFAULT_COLOR.to_string(),
        };
        if color.len() > MAX_COLOR_LEN {
            return Err(CoreError::Validation(format!(
                "Color too long: {} chars (max {MAX_COLOR_LEN})",
                color.len()
            )));
        }

        let parts = build_parts(self.parts)?;

        Ok(TemplateFields {
            name: self.name,
            description: self.description,
            color,
            default_calendar_id: self.default_calendar_id.filter(|c| !c.is_empty()),
            parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Result<TemplateInput, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn into_fields_applies_defaults() {
        let input = parse(json!({
            "name": "Haircut",
            "parts": [{"title": "Book", "offsetMinutes": -1440, "durationMinutes": 30}]
        }))
        .unwrap();

        let fields = input.into_fields().unwrap();
        assert_eq!(fields.color, DEFAULT_COLOR);
        assert_eq!(fields.parts.len(), 1);
        assert!(!fields.parts[0].id.is_empty());
        assert_eq!(fields.default_calendar_id, None);
    }

    #[test]
    fn into_fields_rejects_empty_name() {
        let input = parse(json!({"name": "", "color": "#fff", "parts": []})).unwrap();
        assert_matches!(input.into_fields(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn into_fields_rejects_empty_part_title() {
        let input = parse(json!({
            "name": "Haircut",
            "parts": [{"id": "p1", "title": "", "offsetMinutes": 0, "durationMinutes": 60}]
        }))
        .unwrap();
        assert_matches!(input.into_fields(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn input_rejects_unknown_fields() {
        let result = parse(json!({
            "name": "Haircut",
            "parts": [],
            "userId": "someone-else@example.com"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn input_rejects_mistyped_fields() {
        let result = parse(json!({
            "name": "Haircut",
            "parts": [{"title": "Book", "offsetMinutes": "soon", "durationMinutes": 30}]
        }));
        assert!(result.is_err());
    }
}
