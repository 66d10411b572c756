use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{SortField, StoreError, TaskStore, UserStore, Window};
use crate::models::{Task, User};
use crate::tasks::{Pagination, SortDirection, SortDirective, TaskFilter};

const TASK_COLUMNS: &str = "id, description, completed, owner, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// Postgres-backed store. Task rows reference `users(id)` with
/// `ON DELETE CASCADE`, so deleting a user drops their tasks.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unique_violation(error: sqlx::Error, what: &'static str) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(what),
        _ => StoreError::Database(error),
    }
}

/// Builds the `GET /tasks` listing query. Ties and unsorted results fall back
/// to insertion order through `seq`.
fn task_list_query(
    owner: Uuid,
    filter: TaskFilter,
    sort: Option<&SortDirective>,
    window: Window,
) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner = "));
    query.push_bind(owner);

    if let Some(completed) = filter.completed {
        query.push(" AND completed = ").push_bind(completed);
    }

    // Column names come from a fixed set, never from the request text.
    match sort.and_then(|s| SortField::parse(&s.field).map(|f| (f, s.direction))) {
        Some((field, direction)) => {
            let keyword = match direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            query.push(format!(" ORDER BY {} {keyword}, seq", field.column()));
        }
        None => {
            query.push(" ORDER BY seq");
        }
    }

    if let Some(limit) = window.limit {
        query
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    if window.skip > 0 {
        query
            .push(" OFFSET ")
            .push_bind(i64::try_from(window.skip).unwrap_or(i64::MAX));
    }
    query
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, description, completed, owner, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.owner)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "task id"))
    }

    async fn find_tasks(
        &self,
        owner: Uuid,
        filter: TaskFilter,
        sort: Option<&SortDirective>,
        pagination: Pagination,
    ) -> Result<Vec<Task>, StoreError> {
        let window = Window::from_pagination(pagination)?;
        let mut query = task_list_query(owner, filter, sort, window);
        let tasks = query.build_query_as::<Task>().fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    async fn find_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND owner = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let saved = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET description = $1, completed = $2, updated_at = now()
             WHERE id = $3 AND owner = $4
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.id)
        .bind(task.owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn find_task_and_delete(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let deleted = sqlx::query_as::<_, Task>(&format!(
            "DELETE FROM tasks WHERE id = $1 AND owner = $2 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "email"))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
