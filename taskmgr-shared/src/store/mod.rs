/// Storage contracts for users and tasks
///
/// Usecases depend on the [`UserStore`] and [`TaskStore`] traits only. Two
/// adapters are provided:
///
/// - [`memory`]: mutex-guarded in-process collections (single process, tests)
/// - [`postgres`]: sqlx-backed tables where every operation is one statement
///
/// Stores are constructed once at startup and shared as `Arc<dyn ...>`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskmgr_shared::store::{memory::MemoryTaskStore, TaskStore};
/// use taskmgr_shared::models::task::NewTask;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tasks: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::new());
/// let owner = Uuid::new_v4();
/// let task = tasks
///     .create_task(
///         NewTask {
///             title: "t".into(),
///             description: "d".into(),
///             status: "open".into(),
///             due_date: None,
///         },
///         owner,
///     )
///     .await?;
/// assert_eq!(tasks.get_tasks(owner).await?.len(), 1);
/// # let _ = task;
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::password::{compare_blocking, hash_blocking, PasswordError, PasswordService};
use crate::models::task::{NewTask, Task, TaskPatch};
use crate::models::user::{AuthenticatedUser, Credentials, NewUser, User};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record matches the lookup key
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// An identifier is not a well-formed reference
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Email unknown or password mismatch (deliberately indistinguishable)
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Backend failure
    #[error("Database error: {0}")]
    Database(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateKey(
                    db_err
                        .constraint()
                        .unwrap_or("unique constraint")
                        .to_string(),
                )
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::InvalidId("owner reference".to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Parses a textual identifier into a UUID
///
/// # Errors
///
/// Returns `StoreError::InvalidId` if `raw` is not a UUID.
pub fn parse_id(raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// User persistence contract
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a user whose password is already a digest
    ///
    /// # Errors
    ///
    /// `StoreError::DuplicateKey` if the email is taken.
    async fn register(&self, user: NewUser) -> StoreResult<User>;

    /// Looks up a user by email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Returns every user
    async fn get_users(&self) -> StoreResult<Vec<User>>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Looks up a user by email, failing when absent
    async fn get_user(&self, email: &str) -> StoreResult<User> {
        self.find_by_email(email)
            .await?
            .ok_or(StoreError::NotFound("user"))
    }

    /// Resolves credentials to the stored identity
    ///
    /// Unknown email and wrong password both return
    /// `StoreError::InvalidCredentials`. When the email is unknown the
    /// candidate is still hashed once so both paths do the same Argon2 work.
    async fn login(
        &self,
        credentials: &Credentials,
        passwords: Arc<dyn PasswordService>,
    ) -> StoreResult<AuthenticatedUser> {
        let Some(user) = self.find_by_email(&credentials.email).await? else {
            let _ = hash_blocking(passwords, credentials.password.clone()).await;
            return Err(StoreError::InvalidCredentials);
        };

        match compare_blocking(
            passwords,
            user.password_hash.clone(),
            credentials.password.clone(),
        )
        .await
        {
            Ok(()) => Ok(AuthenticatedUser::from(&user)),
            Err(PasswordError::Mismatch) => Err(StoreError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                Err(StoreError::InvalidCredentials)
            }
        }
    }
}

/// Task persistence contract
///
/// None of these operations check ownership; that is the task usecase's job.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a task owned by `owner_id`
    async fn create_task(&self, task: NewTask, owner_id: Uuid) -> StoreResult<Task>;

    /// Fetches one task
    async fn get_task(&self, task_id: Uuid) -> StoreResult<Task>;

    /// Lists the tasks owned by `owner_id` in creation order
    async fn get_tasks(&self, owner_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Replaces every supplied field of the task
    async fn update_task(&self, task_id: Uuid, patch: TaskPatch) -> StoreResult<Task>;

    /// Deletes a task
    async fn remove_task(&self, task_id: Uuid) -> StoreResult<()>;
}
