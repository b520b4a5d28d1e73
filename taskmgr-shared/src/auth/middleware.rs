/// Access-control gate for Axum
///
/// Every protected request walks the same states:
///
/// ```text
/// Unauthenticated -> Token-Present -> Token-Verified -> Role-Checked -> Admitted
/// ```
///
/// and is rejected at the first step that fails:
///
/// | Step | Status | Message |
/// |---|---|---|
/// | no or empty `Authorization` header | 401 | `Authorization header is required` |
/// | not `Bearer <token>` | 401 | `Invalid authorization header` |
/// | signature/format check fails | 401 | `Invalid token` |
/// | role differs from the route's role | 403 | `forbidden` |
///
/// Admitted requests carry an [`AuthContext`] in their extensions.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskmgr_shared::auth::jwt::JwtService;
/// use taskmgr_shared::auth::middleware::{role_gate, AuthContext, RoleGate};
/// use taskmgr_shared::models::user::Role;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.email)
/// }
///
/// let gate = RoleGate::new(Arc::new(JwtService::new("secret")), Role::Admin);
/// let app: Router = Router::new()
///     .route("/admin", get(handler))
///     .layer(middleware::from_fn_with_state(gate, role_gate));
/// ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::authorization::require_role;
use super::jwt::{Claims, TokenService};
use crate::models::user::Role;

/// Verified caller identity added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Gate rejection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingHeader,

    #[error("Invalid authorization header")]
    InvalidHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("forbidden")]
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = if status == StatusCode::FORBIDDEN {
            "forbidden"
        } else {
            "unauthorized"
        };

        (
            status,
            Json(json!({ "error": code, "message": self.to_string() })),
        )
            .into_response()
    }
}

/// Extracts the token from an `Authorization` header value
///
/// The value must be exactly two space-separated parts, the first being
/// `Bearer` in any letter case.
pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthError::InvalidHeader),
    }
}

/// Runs the header and token steps of the gate
pub fn authenticate(headers: &HeaderMap, tokens: &dyn TokenService) -> Result<AuthContext, AuthError> {
    // An empty header counts as absent
    let value = headers
        .get(header::AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    let token = parse_bearer(value)?;

    let claims = tokens.verify_token(token).map_err(|e| {
        debug!(error = %e, "Token verification failed");
        AuthError::InvalidToken
    })?;

    Ok(AuthContext::from(claims))
}

/// Gate configuration for one group of routes
#[derive(Clone)]
pub struct RoleGate {
    tokens: Arc<dyn TokenService>,
    required: Role,
}

impl RoleGate {
    pub fn new(tokens: Arc<dyn TokenService>, required: Role) -> Self {
        Self { tokens, required }
    }
}

/// Axum middleware enforcing a [`RoleGate`]
pub async fn role_gate(
    State(gate): State<RoleGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth = authenticate(req.headers(), gate.tokens.as_ref())?;

    require_role(&auth, gate.required).map_err(|e| {
        debug!(user_id = %auth.user_id, error = %e, "Role check failed");
        AuthError::Forbidden
    })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
