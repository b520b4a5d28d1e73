/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id credential hashing and comparison
/// - [`jwt`]: Session token issuance and verification
/// - [`middleware`]: Bearer-token gate for Axum routes
/// - [`authorization`]: Exact role check
///
/// # Example
///
/// ```no_run
/// use taskmgr_shared::auth::jwt::{JwtService, TokenService};
/// use taskmgr_shared::auth::password::{Argon2PasswordService, PasswordService};
/// use taskmgr_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let passwords = Argon2PasswordService::default();
/// let digest = passwords.hash("user_password")?;
/// passwords.compare(&digest, "user_password")?;
///
/// let tokens = JwtService::new("a-secret-of-at-least-thirty-two-bytes");
/// let token = tokens.issue_token(Uuid::new_v4(), "a@x.com", Role::User)?;
/// let claims = tokens.verify_token(&token)?;
/// assert_eq!(claims.role, Role::User);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
