/// Registration, login and user lookup
///
/// Registration validates, hashes and persists; login resolves the
/// credentials through the store and mints a session token. Admin-only
/// gating for the lookups happens in the access-control gate, not here.

use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::jwt::TokenService;
use crate::auth::password::{hash_blocking, PasswordService};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{Credentials, NewUser, RegisterUser, Role, User};
use crate::store::{StoreError, UserStore};

const GENERIC_LOGIN_ERROR: &str = "invalid email or password";

/// User orchestration over injected store, hashing and token services
#[derive(Clone)]
pub struct UserUsecase {
    store: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl UserUsecase {
    pub fn new(
        store: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    /// Registers a new account
    ///
    /// # Errors
    ///
    /// - `Validation` if email, password or role is empty, or role is unknown
    /// - `Conflict` if the email is already registered
    /// - `Internal` if hashing or the store fails
    pub async fn register(&self, input: RegisterUser) -> ServiceResult<User> {
        if input.email.is_empty() || input.password.is_empty() || input.role.is_empty() {
            return Err(ServiceError::Validation("incomplete information".to_string()));
        }

        let role: Role = input
            .role
            .parse()
            .map_err(|_| ServiceError::Validation(format!("invalid role: {}", input.role)))?;

        let password_hash = hash_blocking(self.passwords.clone(), input.password.clone()).await?;

        let user = self
            .store
            .register(NewUser {
                email: input.email,
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Authenticates credentials and returns a signed session token
    ///
    /// # Errors
    ///
    /// Every failure, whatever its cause, is reported as
    /// `Auth("invalid email or password")`.
    pub async fn login(&self, credentials: Credentials) -> ServiceResult<String> {
        let identity = match self.store.login(&credentials, self.passwords.clone()).await {
            Ok(identity) => identity,
            Err(StoreError::InvalidCredentials) => {
                return Err(ServiceError::Auth(GENERIC_LOGIN_ERROR.to_string()));
            }
            Err(e) => {
                warn!(error = %e, "Login failed on store error");
                return Err(ServiceError::Auth(GENERIC_LOGIN_ERROR.to_string()));
            }
        };

        let token = self
            .tokens
            .issue_token(identity.id, &identity.email, identity.role)
            .map_err(|e| {
                warn!(user_id = %identity.id, error = %e, "Token issuance failed");
                ServiceError::Auth(GENERIC_LOGIN_ERROR.to_string())
            })?;

        info!(user_id = %identity.id, "User logged in");
        Ok(token)
    }

    /// Fetches one user by email
    pub async fn get_user(&self, email: &str) -> ServiceResult<User> {
        Ok(self.store.get_user(email).await?)
    }

    /// Lists every user
    pub async fn get_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.store.get_users().await?)
    }

    /// Probes the backing store
    pub async fn health_check(&self) -> ServiceResult<()> {
        Ok(self.store.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtService;
    use crate::auth::password::{Argon2PasswordService, PasswordConfig};
    use crate::store::memory::MemoryUserStore;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn usecase() -> UserUsecase {
        UserUsecase::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(Argon2PasswordService::new(PasswordConfig::new(8, 1, 1)).unwrap()),
            Arc::new(JwtService::new(SECRET)),
        )
    }

    fn register_input(email: &str, password: &str, role: &str) -> RegisterUser {
        RegisterUser {
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let users = usecase();
        let user = users.register(register_input("a@x.com", "pw", "user")).await.unwrap();

        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "pw");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_rejects_incomplete() {
        let users = usecase();

        for input in [
            register_input("", "pw", "user"),
            register_input("a@x.com", "pw", ""),
            register_input("a@x.com", "", "user"),
        ] {
            assert!(matches!(
                users.register(input).await,
                Err(ServiceError::Validation(msg)) if msg == "incomplete information"
            ));
        }
        assert!(users.get_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let users = usecase();
        let result = users.register(register_input("a@x.com", "pw", "root")).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let users = usecase();
        users.register(register_input("a@x.com", "pw", "user")).await.unwrap();

        let result = users.register(register_input("a@x.com", "other", "admin")).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        let all = users.get_users().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_login_issues_token_with_identity() {
        let users = usecase();
        let user = users.register(register_input("a@x.com", "pw", "admin")).await.unwrap();

        let token = users.login(credentials("a@x.com", "pw")).await.unwrap();
        assert!(!token.is_empty());

        let claims = JwtService::new(SECRET).verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_failures_are_identical() {
        let users = usecase();
        users.register(register_input("a@x.com", "pw", "user")).await.unwrap();

        let wrong_password = users.login(credentials("a@x.com", "pwx")).await.unwrap_err();
        let unknown_email = users.login(credentials("b@x.com", "pw")).await.unwrap_err();

        assert_eq!(wrong_password, unknown_email);
        assert_eq!(
            wrong_password,
            ServiceError::Auth("invalid email or password".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_user() {
        let users = usecase();
        users.register(register_input("a@x.com", "pw", "user")).await.unwrap();

        assert_eq!(users.get_user("a@x.com").await.unwrap().email, "a@x.com");
        assert!(matches!(
            users.get_user("missing@x.com").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_health_check_memory() {
        assert!(usecase().health_check().await.is_ok());
    }
}
