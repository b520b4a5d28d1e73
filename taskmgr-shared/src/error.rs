/// Service-level error taxonomy
///
/// Usecases return [`ServiceError`]. Store errors are converted only where
/// the category changes (duplicate key becomes a conflict, a malformed id
/// becomes a validation error); everything else keeps its meaning.

use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Error type for usecase operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or bad/missing token
    #[error("{0}")]
    Auth(String),

    /// Unknown task, user or id
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (duplicate email)
    #[error("{0}")]
    Conflict(String),

    /// Store unreachable, hashing failure, ...
    #[error("{0}")]
    Internal(String),
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServiceError::NotFound(format!("{} not found", what)),
            StoreError::DuplicateKey(_) => {
                ServiceError::Conflict("email already registered".to_string())
            }
            StoreError::InvalidId(raw) => ServiceError::Validation(format!("invalid id: {}", raw)),
            StoreError::InvalidCredentials => {
                ServiceError::Auth("invalid email or password".to_string())
            }
            StoreError::Database(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}
