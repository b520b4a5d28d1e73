/// Task orchestration with ownership checks
///
/// The caller's identity comes from the verified token and is passed in as
/// `owner_id`. Every operation on an existing task loads it first and
/// rejects it unless the caller owns it; a foreign task is reported exactly
/// like a missing one.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{NewTask, Task, TaskPatch};
use crate::store::{parse_id, TaskStore};

/// Task orchestration over an injected store
#[derive(Clone)]
pub struct TaskUsecase {
    store: Arc<dyn TaskStore>,
}

impl TaskUsecase {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Creates a task owned by `owner_id`
    ///
    /// # Errors
    ///
    /// `Validation` if title, description or status is empty.
    pub async fn create_task(&self, task: NewTask, owner_id: Uuid) -> ServiceResult<Task> {
        if task.title.is_empty() || task.description.is_empty() || task.status.is_empty() {
            return Err(ServiceError::Validation("incomplete information".to_string()));
        }

        let created = self.store.create_task(task, owner_id).await?;

        info!(task_id = %created.id, user_id = %owner_id, "Task created");
        Ok(created)
    }

    /// Fetches a task the caller owns
    pub async fn get_task(&self, task_id: &str, owner_id: Uuid) -> ServiceResult<Task> {
        self.owned_task(task_id, owner_id).await
    }

    /// Lists the caller's tasks
    pub async fn get_tasks(&self, owner_id: Uuid) -> ServiceResult<Vec<Task>> {
        Ok(self.store.get_tasks(owner_id).await?)
    }

    /// Replaces the supplied fields of a task the caller owns
    ///
    /// # Errors
    ///
    /// `Validation` if a supplied title, description or status is empty.
    pub async fn update_task(
        &self,
        task_id: &str,
        patch: TaskPatch,
        owner_id: Uuid,
    ) -> ServiceResult<Task> {
        let supplies_empty = [&patch.title, &patch.description, &patch.status]
            .into_iter()
            .any(|field| matches!(field, Some(value) if value.is_empty()));
        if supplies_empty {
            return Err(ServiceError::Validation(
                "title, description and status cannot be empty".to_string(),
            ));
        }

        let task = self.owned_task(task_id, owner_id).await?;
        let updated = self.store.update_task(task.id, patch).await?;

        info!(task_id = %updated.id, user_id = %owner_id, "Task updated");
        Ok(updated)
    }

    /// Deletes a task the caller owns
    pub async fn remove_task(&self, task_id: &str, owner_id: Uuid) -> ServiceResult<()> {
        let task = self.owned_task(task_id, owner_id).await?;
        self.store.remove_task(task.id).await?;

        info!(task_id = %task.id, user_id = %owner_id, "Task removed");
        Ok(())
    }

    async fn owned_task(&self, task_id: &str, owner_id: Uuid) -> ServiceResult<Task> {
        let id = parse_id(task_id)?;
        let task = self.store.get_task(id).await?;

        if !task.is_owned_by(owner_id) {
            debug!(task_id = %id, user_id = %owner_id, "Rejected access to foreign task");
            return Err(ServiceError::NotFound("task not found".to_string()));
        }

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryTaskStore;

    fn usecase() -> TaskUsecase {
        TaskUsecase::new(Arc::new(MemoryTaskStore::new()))
    }

    fn new_task(title: &str, description: &str, status: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: description.to_string(),
            status: status.to_string(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_task_validation() {
        let tasks = usecase();
        let owner = Uuid::new_v4();

        for input in [
            new_task("", "d", "open"),
            new_task("t", "", "open"),
            new_task("t", "d", ""),
        ] {
            assert!(matches!(
                tasks.create_task(input, owner).await,
                Err(ServiceError::Validation(_))
            ));
        }
        assert!(tasks.get_tasks(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get_own_task() {
        let tasks = usecase();
        let owner = Uuid::new_v4();

        let created = tasks.create_task(new_task("t", "d", "open"), owner).await.unwrap();
        let fetched = tasks.get_task(&created.id.to_string(), owner).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(tasks.get_tasks(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cross_user_access_rejected() {
        let tasks = usecase();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();

        let created = tasks.create_task(new_task("t", "d", "open"), u1).await.unwrap();
        let id = created.id.to_string();

        assert!(tasks.get_tasks(u2).await.unwrap().is_empty());
        assert!(matches!(tasks.get_task(&id, u2).await, Err(ServiceError::NotFound(_))));

        let patch = TaskPatch {
            title: Some("hijacked".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            tasks.update_task(&id, patch, u2).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(tasks.remove_task(&id, u2).await, Err(ServiceError::NotFound(_))));

        let still_there = tasks.get_task(&id, u1).await.unwrap();
        assert_eq!(still_there.title, "t");
    }

    #[tokio::test]
    async fn test_update_task() {
        let tasks = usecase();
        let owner = Uuid::new_v4();
        let created = tasks.create_task(new_task("t", "d", "open"), owner).await.unwrap();

        let updated = tasks
            .update_task(
                &created.id.to_string(),
                TaskPatch {
                    status: Some("done".to_string()),
                    ..Default::default()
                },
                owner,
            )
            .await
            .unwrap();

        assert_eq!(updated.status, "done");
        assert_eq!(updated.title, "t");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_fields() {
        let tasks = usecase();
        let owner = Uuid::new_v4();
        let created = tasks.create_task(new_task("t", "d", "open"), owner).await.unwrap();

        let result = tasks
            .update_task(
                &created.id.to_string(),
                TaskPatch {
                    title: Some(String::new()),
                    ..Default::default()
                },
                owner,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_remove_task_twice_is_not_found() {
        let tasks = usecase();
        let owner = Uuid::new_v4();
        let created = tasks.create_task(new_task("t", "d", "open"), owner).await.unwrap();
        let id = created.id.to_string();

        tasks.remove_task(&id, owner).await.unwrap();

        let first = tasks.remove_task(&id, owner).await;
        let second = tasks.remove_task(&id, owner).await;
        assert!(matches!(first, Err(ServiceError::NotFound(_))));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_id_is_validation_error() {
        let tasks = usecase();

        assert!(matches!(
            tasks.get_task("not-a-uuid", Uuid::new_v4()).await,
            Err(ServiceError::Validation(_))
        ));
    }
}
