use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use super::{build_filter, resolve_pagination, validate_update, TaskError};
use crate::models::{NewTask, Task, TaskQuery};
use crate::store::TaskStore;

/// CRUD over tasks, always keyed by the requesting owner.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: Uuid, input: NewTask) -> Result<Task, TaskError> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;
        let task = Task::new(input, owner);
        Ok(self.store.insert_task(&task).await?)
    }

    /// Lists the owner's tasks using the raw `GET /tasks` parameters.
    /// An empty result is not an error.
    pub async fn list(&self, owner: Uuid, query: &TaskQuery) -> Result<Vec<Task>, TaskError> {
        let (filter, sort) = build_filter(query);
        let pagination = resolve_pagination(query);
        Ok(self
            .store
            .find_tasks(owner, filter, sort.as_ref(), pagination)
            .await?)
    }

    pub async fn get_by_id(&self, owner: Uuid, id: Uuid) -> Result<Task, TaskError> {
        self.store
            .find_task(owner, id)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Validates `fields` against the whitelist before touching the store,
    /// then loads, mutates and saves the task.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<Task, TaskError> {
        let update = validate_update(fields)?;
        let mut task = self.get_by_id(owner, id).await?;
        task.apply(update);
        self.store
            .save_task(&task)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Deletes the task and returns its last state.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Task, TaskError> {
        self.store
            .find_task_and_delete(owner, id)
            .await?
            .ok_or(TaskError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryStore::new()))
    }

    fn new_task(description: &str) -> NewTask {
        NewTask {
            description: description.into(),
            completed: None,
        }
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[actix_rt::test]
    async fn test_other_owner_gets_not_found() {
        let tasks = service();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let task = tasks.create(a, new_task("secret")).await.unwrap();

        assert!(matches!(tasks.get_by_id(b, task.id).await, Err(TaskError::NotFound)));
        assert!(matches!(
            tasks.update(b, task.id, &fields(json!({"completed": true}))).await,
            Err(TaskError::NotFound)
        ));
        assert!(matches!(tasks.delete(b, task.id).await, Err(TaskError::NotFound)));
        assert!(!tasks.get_by_id(a, task.id).await.unwrap().completed);
    }

    #[actix_rt::test]
    async fn test_create_rejects_blank_description() {
        let result = service().create(Uuid::new_v4(), new_task("  ")).await;
        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[actix_rt::test]
    async fn test_update_checks_whitelist_before_lookup() {
        let result = service()
            .update(Uuid::new_v4(), Uuid::new_v4(), &fields(json!({"foo": 1})))
            .await;
        assert!(matches!(result, Err(TaskError::InvalidUpdates)));
    }

    #[actix_rt::test]
    async fn test_update_then_delete() {
        let tasks = service();
        let owner = Uuid::new_v4();
        let task = tasks.create(owner, new_task("buy milk")).await.unwrap();

        let updated = tasks
            .update(owner, task.id, &fields(json!({"completed": true})))
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.description, "buy milk");
        assert!(updated.updated_at >= task.updated_at);

        let deleted = tasks.delete(owner, task.id).await.unwrap();
        assert!(deleted.completed);
        assert!(matches!(tasks.get_by_id(owner, task.id).await, Err(TaskError::NotFound)));
    }

    #[actix_rt::test]
    async fn test_list_by_completion() {
        let tasks = service();
        let owner = Uuid::new_v4();
        let done = tasks.create(owner, new_task("done")).await.unwrap();
        tasks
            .update(owner, done.id, &fields(json!({"completed": true})))
            .await
            .unwrap();
        tasks.create(owner, new_task("open")).await.unwrap();

        let all = tasks.list(owner, &TaskQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let query = TaskQuery {
            completed: Some("false".into()),
            ..Default::default()
        };
        let open = tasks.list(owner, &query).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].description, "open");

        let nobody = tasks.list(Uuid::new_v4(), &TaskQuery::default()).await.unwrap();
        assert!(nobody.is_empty());
    }
}
