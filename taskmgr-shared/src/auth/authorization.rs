/// Role gate
///
/// Each protected route names the single role it admits. The check is an
/// exact match: admin tokens are not admitted to user routes and vice versa.
///
/// # Example
///
/// ```
/// use taskmgr_shared::auth::authorization::require_role;
/// use taskmgr_shared::auth::middleware::AuthContext;
/// use taskmgr_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let auth = AuthContext {
///     user_id: Uuid::new_v4(),
///     email: "root@x.com".to_string(),
///     role: Role::Admin,
/// };
///
/// assert!(require_role(&auth, Role::Admin).is_ok());
/// assert!(require_role(&auth, Role::User).is_err());
/// ```

use super::middleware::AuthContext;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role does not match the route's role
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    WrongRole { required: Role, actual: Role },
}

/// Checks that the caller holds exactly `required`
pub fn require_role(auth: &AuthContext, required: Role) -> Result<(), AuthzError> {
    if auth.role != required {
        return Err(AuthzError::WrongRole {
            required,
            actual: auth.role,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_role_matches() {
        assert!(require_role(&context(Role::User), Role::User).is_ok());
        assert!(require_role(&context(Role::Admin), Role::Admin).is_ok());
    }

    #[test]
    fn test_require_role_mismatch() {
        let err = require_role(&context(Role::User), Role::Admin).unwrap_err();
        assert_eq!(
            err,
            AuthzError::WrongRole {
                required: Role::Admin,
                actual: Role::User
            }
        );
        assert!(require_role(&context(Role::Admin), Role::User).is_err());
    }
}
