use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents a task entity as stored and returned by the API.
///
/// Serialized in camelCase (`createdAt`, `updatedAt`) to match the JSON surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4), assigned at creation.
    pub id: Uuid,
    /// What needs doing. Never blank.
    pub description: String,
    /// Whether the task is done. Defaults to `false`.
    pub completed: bool,
    /// Identifier of the user who created the task. Never changes.
    pub owner: Uuid,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last write to the task.
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
///
/// Only `description` and `completed` are read from the request body; any other
/// field, including `owner`, is ignored. The owner always comes from the token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTask {
    #[validate(custom = "not_blank")]
    pub description: String,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// The whitelisted, type-checked changes of a PATCH request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Raw query parameters accepted by `GET /tasks`.
///
/// Everything stays a string here; interpretation happens in
/// [`crate::tasks::filter`] and [`crate::tasks::pagination`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub completed: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

impl Task {
    /// Creates a new `Task` for `owner` from validated input.
    /// The description is trimmed; `created_at` and `updated_at` are set to now.
    pub fn new(input: NewTask, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: input.description.trim().to_string(),
            completed: input.completed.unwrap_or(false),
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the whitelisted fields of `update` in place.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
