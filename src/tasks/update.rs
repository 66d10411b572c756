//! Whitelist validation for `PATCH /tasks/{id}` bodies.

use serde_json::{Map, Value};

use super::TaskError;
use crate::models::TaskUpdate;

/// The only fields a client may change on an existing task.
pub const ALLOWED_UPDATES: [&str; 2] = ["description", "completed"];

/// Accepts `fields` only if every key is whitelisted, then checks value types.
///
/// Any unknown key rejects the whole request with [`TaskError::InvalidUpdates`]
/// without naming the offending field. An empty map is a valid no-op.
pub fn validate_update(fields: &Map<String, Value>) -> Result<TaskUpdate, TaskError> {
    if !fields.keys().all(|key| ALLOWED_UPDATES.contains(&key.as_str())) {
        return Err(TaskError::InvalidUpdates);
    }

    let mut update = TaskUpdate::default();
    if let Some(value) = fields.get("description") {
        match value.as_str() {
            Some(description) if !description.trim().is_empty() => {
                update.description = Some(description.to_string());
            }
            _ => {
                return Err(TaskError::Validation(
                    "description must be a non-empty string".into(),
                ))
            }
        }
    }
    if let Some(value) = fields.get("completed") {
        update.completed = Some(
            value
                .as_bool()
                .ok_or_else(|| TaskError::Validation("completed must be a boolean".into()))?,
        );
    }
    Ok(update)
}
