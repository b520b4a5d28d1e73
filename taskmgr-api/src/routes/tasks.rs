/// Task endpoints
///
/// Every route here sits behind the `user` role gate; the owner is always
/// the caller identified by the token, never a value from the request.
///
/// # Endpoints
///
/// - `POST   /tasks` - Create a task
/// - `GET    /tasks` - List the caller's tasks
/// - `GET    /tasks/:id` - Fetch one task
/// - `PUT    /tasks/:id` - Replace supplied fields of a task
/// - `DELETE /tasks/:id` - Remove a task

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use taskmgr_shared::{
    auth::middleware::AuthContext,
    models::task::{NewTask, Task, TaskPatch},
};

/// Plain acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or empty title/description/status
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(task) = payload?;
    let created = state.tasks.create_task(task, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's tasks
pub async fn get_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.get_tasks(auth.user_id).await?))
}

/// Fetch one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such task, or owned by someone else
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.get_task(&id, auth.user_id).await?))
}

/// Replace the supplied fields of one of the caller's tasks
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(patch) = payload?;
    Ok(Json(state.tasks.update_task(&id, patch, auth.user_id).await?))
}

/// Remove one of the caller's tasks
pub async fn remove_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.tasks.remove_task(&id, auth.user_id).await?;

    Ok(Json(MessageResponse {
        message: "task removed".to_string(),
    }))
}
