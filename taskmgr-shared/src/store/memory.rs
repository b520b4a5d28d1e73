/// In-memory store adapters
///
/// Each collection sits behind a single `tokio::sync::Mutex` that is held for
/// the whole read/modify/write of an operation. This is correct for a single
/// process only; state is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::models::task::{NewTask, Task, TaskPatch};
use crate::models::user::{NewUser, User};

/// Mutex-guarded user collection
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn register(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.lock().await;

        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey("users_email_key".to_string()));
        }

        let stored = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(stored.clone());

        debug!(user_id = %stored.id, "Stored user in memory");
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.lock().await.clone())
    }
}

/// Mutex-guarded task collection, kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create_task(&self, task: NewTask, owner_id: Uuid) -> StoreResult<Task> {
        let now = Utc::now();
        let stored = Task {
            id: Uuid::new_v4(),
            user_id: owner_id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
        };

        self.tasks.lock().await.push(stored.clone());

        debug!(task_id = %stored.id, user_id = %owner_id, "Stored task in memory");
        Ok(stored)
    }

    async fn get_task(&self, task_id: Uuid) -> StoreResult<Task> {
        let tasks = self.tasks.lock().await;
        tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or(StoreError::NotFound("task"))
    }

    async fn get_tasks(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.lock().await;
        Ok(tasks
            .iter()
            .filter(|t| t.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn update_task(&self, task_id: Uuid, patch: TaskPatch) -> StoreResult<Task> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(StoreError::NotFound("task"))?;

        patch.apply(task);
        Ok(task.clone())
    }

    async fn remove_task(&self, task_id: Uuid) -> StoreResult<()> {
        let mut tasks = self.tasks.lock().await;
        let index = tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(StoreError::NotFound("task"))?;

        tasks.remove(index);
        Ok(())
    }
}
