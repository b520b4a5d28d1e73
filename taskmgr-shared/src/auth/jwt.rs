/// Session token issuance and verification
///
/// Tokens are HS256-signed JWTs carrying the user's id, email and role. They
/// are stateless: nothing is persisted and verification is a signature check
/// against the process-wide secret.
///
/// # Security
///
/// - **Algorithm**: HS256 only; tokens declaring any other algorithm are rejected
/// - **Expiration**: none by default; enabled with [`JwtService::with_ttl`]
/// - **Secret Management**: loaded once at startup, never rotated at runtime
///
/// # Example
///
/// ```
/// use taskmgr_shared::auth::jwt::{JwtService, TokenService};
/// use taskmgr_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = JwtService::new("your-secret-key-at-least-32-bytes");
/// let user_id = Uuid::new_v4();
///
/// let token = service.issue_token(user_id, "a@x.com", Role::User)?;
/// let claims = service.verify_token(&token)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    Create(String),

    /// Token is malformed or its signature does not match
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Token declares an algorithm other than HS256
    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Claims embedded in a session token
///
/// - `sub`: Subject (user ID)
/// - `email`: Login email at issue time
/// - `role`: Role at issue time
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp, only when a TTL is configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,

    pub email: String,

    pub role: Role,

    pub iat: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Creates claims issued now, without expiry
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self {
            sub: user_id,
            email: email.into(),
            role,
            iat: Utc::now().timestamp(),
            exp: None,
        }
    }

    /// Creates claims that expire after `expires_in`
    pub fn with_expiration(
        user_id: Uuid,
        email: impl Into<String>,
        role: Role,
        expires_in: Duration,
    ) -> Self {
        let mut claims = Self::new(user_id, email, role);
        claims.exp = Some(claims.iat + expires_in.num_seconds());
        claims
    }
}

/// Token service contract
pub trait TokenService: Send + Sync {
    /// Signs a token bound to the given identity
    fn issue_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String, JwtError>;

    /// Verifies a token and returns its claims verbatim
    fn verify_token(&self, token: &str) -> Result<Claims, JwtError>;
}

/// HS256 implementation of [`TokenService`]
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl JwtService {
    /// Creates a service issuing non-expiring tokens
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: None,
        }
    }

    /// Creates a service whose tokens carry and enforce an `exp` claim
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        let mut service = Self::new(secret);
        service.validation.validate_exp = true;
        service.validation.leeway = 0;
        service.validation.set_required_spec_claims(&["exp"]);
        service.ttl = Some(ttl);
        service
    }

    /// Signs arbitrary claims with the service key
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::Create(format!("Token encoding failed: {}", e)))
    }
}

impl TokenService for JwtService {
    fn issue_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String, JwtError> {
        let claims = match self.ttl {
            Some(ttl) => Claims::with_expiration(user_id, email, role, ttl),
            None => Claims::new(user_id, email, role),
        };

        self.sign(&claims)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
                _ => JwtError::Invalid(e.to_string()),
            },
        )?;

        Ok(token_data.claims)
    }
}
