//! Template parts and the validation rules applied before persistence.
//!
//! A template is an ordered list of parts; each part is placed relative to
//! the anchor by a signed minute offset. Part order is significant and is
//! never changed by anything in this module.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum length for a template name.
pub const MAX_TEMPLATE_NAME_LEN: usize = 200;

/// Maximum length for a part title.
pub const MAX_PART_TITLE_LEN: usize = 500;

/// Maximum length for a description (templates and parts).
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Maximum number of parts in one template.
pub const MAX_PARTS: usize = 100;

/// Default display color for templates created without one.
pub const DEFAULT_COLOR: &str = "#f59e0b";

/* --------------------------------------------------------------------------
   Types
   -------------------------------------------------------------------------- */

/// One element of a template, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePart {
    pub id: String,
    pub title: String,
    /// Minutes relative to the anchor. Negative = before the anchor.
    pub offset_minutes: i64,
    /// Length of span items in minutes. Ignored for point items.
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A part as submitted by a client. The id is optional and is filled in
/// by [`build_parts`] when missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplatePartInput {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub offset_minutes: i64,
    pub duration_minutes: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/* --------------------------------------------------------------------------
   Validation functions
   -------------------------------------------------------------------------- */

/// Validate a template name: non-blank and within length limit.
pub fn validate_template_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Template name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_TEMPLATE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Template name too long: {} chars (max {MAX_TEMPLATE_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate an optional description against the shared length limit.
pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.len() > MAX_DESCRIPTION_LEN => Err(CoreError::Validation(format!(
            "Description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
            d.len()
        ))),
        _ => Ok(()),
    }
}

/// Validate a single part. `position` is 1-based and only used in messages.
pub fn validate_part(part: &TemplatePart, position: usize) -> Result<(), CoreError> {
    if part.id.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Part {position}: id must not be empty"
        )));
    }
    if part.title.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Part {position}: title must not be empty"
        )));
    }
    if part.title.len() > MAX_PART_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Part {position}: title too long: {} chars (max {MAX_PART_TITLE_LEN})",
            part.title.len()
        )));
    }
    if part.duration_minutes <= 0 {
        return Err(CoreError::Validation(format!(
            "Part {position}: duration must be positive, got {}",
            part.duration_minutes
        )));
    }
    if let Some(d) = part.description.as_deref() {
        if d.len() > MAX_DESCRIPTION_LEN {
            return Err(CoreError::Validation(format!(
                "Part {position}: description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
                d.len()
            )));
        }
    }
    Ok(())
}

/// Validate a full parts list: every part valid and ids unique.
pub fn validate_parts(parts: &[TemplatePart]) -> Result<(), CoreError> {
    if parts.len() > MAX_PARTS {
        return Err(CoreError::Validation(format!(
            "Too many parts: {} (max {MAX_PARTS})",
            parts.len()
        )));
    }
    let mut seen = HashSet::with_capacity(parts.len());
    for (i, part) in parts.iter().enumerate() {
        validate_part(part, i + 1)?;
        if !seen.insert(part.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate part id '{}'",
                part.id
            )));
        }
    }
    Ok(())
}

/// Turn client-submitted parts into stored parts, assigning fresh ids where
/// the client sent none, then validate the result. Order is preserved.
pub fn build_parts(inputs: Vec<TemplatePartInput>) -> Result<Vec<TemplatePart>, CoreError> {
    let parts: Vec<TemplatePart> = inputs
        .into_iter()
        .map(|p| TemplatePart {
            id: p
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: p.title,
            offset_minutes: p.offset_minutes,
            duration_minutes: p.duration_minutes,
            description: p.description,
        })
        .collect();
    validate_parts(&parts)?;
    Ok(parts)
}
