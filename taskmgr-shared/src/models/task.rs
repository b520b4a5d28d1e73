/// Task model
///
/// A task belongs to exactly one user. The owner reference is fixed at
/// creation and is not part of the JSON representation.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     status TEXT NOT NULL,
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    #[serde(skip)]
    pub user_id: Uuid,

    pub title: String,

    pub description: String,

    /// Free-form status label chosen by the caller
    pub status: String,

    /// Optional due date
    #[serde(alias = "dueDate", alias = "duedate", default)]
    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether `user_id` owns this task
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: String,

    #[serde(alias = "dueDate", alias = "duedate", default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Replacement values for an existing task
///
/// Every `Some` field overwrites the stored value; `None` fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(alias = "dueDate", alias = "duedate", default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Applies the patch in place and bumps `updated_at`
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();
    }
}
