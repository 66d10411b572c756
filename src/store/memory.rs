use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SortField, StoreError, TaskStore, UserStore, Window};
use crate::models::{Task, User};
use crate::tasks::{Pagination, SortDirection, SortDirective, TaskFilter};

/// In-process store. Tasks are kept in insertion order, which is the natural
/// order returned when no sort is requested.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Description => a.description.cmp(&b.description),
        SortField::Completed => a.completed.cmp(&b.completed),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::Duplicate("task id"));
        }
        tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn find_tasks(
        &self,
        owner: Uuid,
        filter: TaskFilter,
        sort: Option<&SortDirective>,
        pagination: Pagination,
    ) -> Result<Vec<Task>, StoreError> {
        let window = Window::from_pagination(pagination)?;
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .iter()
            .filter(|t| t.owner == owner && filter.matches(t.completed))
            .cloned()
            .collect();
        drop(tasks);

        if let Some(sort) = sort {
            if let Some(field) = SortField::parse(&sort.field) {
                matching.sort_by(|a, b| match sort.direction {
                    SortDirection::Ascending => compare(a, b, field),
                    SortDirection::Descending => compare(b, a, field),
                });
            }
        }

        let windowed = matching.into_iter().skip(window.skip);
        Ok(match window.limit {
            Some(limit) => windowed.take(limit).collect(),
            None => windowed.collect(),
        })
    }

    async fn find_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|t| t.id == id && t.owner == owner)
            .cloned())
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let Some(stored) = tasks
            .iter_mut()
            .find(|t| t.id == task.id && t.owner == task.owner)
        else {
            return Ok(None);
        };
        stored.description = task.description.clone();
        stored.completed = task.completed;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn find_task_and_delete(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let position = tasks.iter().position(|t| t.id == id && t.owner == owner);
        Ok(position.map(|index| tasks.remove(index)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        let Some(user) = users.remove(&id) else {
            return Ok(None);
        };
        self.tasks.write().await.retain(|t| t.owner != id);
        Ok(Some(user))
    }
}
