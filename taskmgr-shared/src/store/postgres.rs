/// PostgreSQL store adapters
///
/// Every operation is a single statement, so each is atomic on its own; no
/// operation spans a transaction. The unique index on `users.email` provides
/// the duplicate-key condition.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskmgr_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskmgr_shared::store::postgres::{PgTaskStore, PgUserStore};
/// use taskmgr_shared::store::{TaskStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
/// let tasks: Arc<dyn TaskStore> = Arc::new(PgTaskStore::new(pool));
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::models::task::{NewTask, Task, TaskPatch};
use crate::models::user::{NewUser, Role, User};

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at";
const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, due_date, created_at, updated_at";

/// Raw `users` row; role is stored as text
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| StoreError::Database(format!("Corrupt user row {}: {}", row.id, e)))?;

        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

/// `users` table adapter
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn register(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = %row.id, "Inserted user");
        row.try_into()
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}

/// `tasks` table adapter
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create_task(&self, task: NewTask, owner_id: Uuid) -> StoreResult<Task> {
        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, user_id, title, description, status, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;

        debug!(task_id = %created.id, user_id = %owner_id, "Inserted task");
        Ok(created)
    }

    async fn get_task(&self, task_id: Uuid) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("task"))
    }

    async fn get_tasks(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
            TASK_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn update_task(&self, task_id: Uuid, patch: TaskPatch) -> StoreResult<Task> {
        // COALESCE keeps the stored value for every field the patch leaves out
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                status = COALESCE($4, status), \
                due_date = COALESCE($5, due_date), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.status)
        .bind(patch.due_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("task"))
    }

    async fn remove_task(&self, task_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("task"));
        }

        Ok(())
    }
}
