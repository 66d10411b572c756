//! Persistence for tasks and users.
//!
//! Two backends implement the same traits: [`MemoryStore`] for development and
//! tests, [`PgStore`] for Postgres. Every task read and write takes the owner
//! alongside the id; there is no id-only lookup.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Task, User};
use crate::tasks::{Pagination, SortDirective, TaskFilter};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),
    #[error("invalid result window: {0}")]
    InvalidWindow(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError>;

    async fn find_tasks(
        &self,
        owner: Uuid,
        filter: TaskFilter,
        sort: Option<&SortDirective>,
        pagination: Pagination,
    ) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Writes the mutable fields of `task` back, scoped by `(task.id, task.owner)`,
    /// and stamps `updated_at`. `None` means the task is gone.
    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError>;

    /// Removes and returns the task in one step.
    async fn find_task_and_delete(&self, owner: Uuid, id: Uuid)
        -> Result<Option<Task>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<User, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Removes the user together with every task they own.
    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Sortable task columns. Unrecognised names map to `None` and sort nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortField {
    Id,
    Description,
    Completed,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "id" | "_id" => Some(Self::Id),
            "description" => Some(Self::Description),
            "completed" => Some(Self::Completed),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Description => "description",
            Self::Completed => "completed",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// A pagination request normalised to what both backends execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub limit: Option<usize>,
    pub skip: usize,
}

impl Window {
    /// A zero limit means "no limit" and a negative limit counts by its
    /// absolute value. A negative skip cannot be executed.
    pub(crate) fn from_pagination(pagination: Pagination) -> Result<Self, StoreError> {
        let skip = match pagination.skip {
            None => 0,
            Some(skip) if skip < 0 => {
                return Err(StoreError::InvalidWindow(format!(
                    "skip must be non-negative, got {skip}"
                )))
            }
            Some(skip) => usize::try_from(skip).unwrap_or(usize::MAX),
        };
        let limit = match pagination.limit {
            None | Some(0) => None,
            Some(limit) => Some(usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX)),
        };
        Ok(Self { limit, skip })
    }
}
