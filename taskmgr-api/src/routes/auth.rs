/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Register new user
/// - `POST /login` - Login and get a session token

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskmgr_shared::models::user::{Credentials, RegisterUser, User};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before it is stored
    #[serde(default)]
    pub password: String,

    /// `user` or `admin`
    #[serde(default)]
    pub role: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,

    /// Stored user, without the password digest
    pub user: User,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,

    /// Bearer token for protected routes
    pub token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "role": "user"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "registered successfully",
///   "user": { "id": "uuid", "email": "user@example.com", "role": "user", "created_at": "..." }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, missing field, unknown role
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .users
        .register(RegisterUser {
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "registered successfully".to_string(),
            user,
        }),
    ))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "user logged in successfully",
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Invalid credentials (same body for every cause)
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let token = state
        .users
        .login(Credentials {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "user logged in successfully".to_string(),
        token,
    }))
}
