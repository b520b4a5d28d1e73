/// Admin user lookup
///
/// Both routes sit behind the `admin` role gate.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use taskmgr_shared::models::user::User;

/// `GET /users`
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.get_users().await?))
}

/// `GET /users/:email`
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.get_user(&email).await?))
}
