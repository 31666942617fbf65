/// Task manager endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create task
/// - `GET /tasks?done=&limit=` - List tasks
/// - `GET /tasks/:id` - Get task
/// - `PUT /tasks/:id` - Replace task
/// - `PATCH /tasks/:id` - Patch task
/// - `DELETE /tasks/:id` - Delete task
/// - `POST /tasks/:id/complete` - Mark task done
///
/// # Side-effects
///
/// Creating a task schedules a `status_log` stamp; completing one schedules
/// the delayed `completed_at` stamp. Both run on the background worker after
/// the response has been produced, so neither is visible in the response.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{parse_id, ValidatedJson},
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use roster_shared::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use roster_worker::effects::SideEffect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    /// Only tasks with this `done` flag
    pub done: Option<bool>,

    /// Maximum number of tasks to return, must be positive
    pub limit: Option<i64>,
}

impl TaskListQuery {
    fn into_filter(self) -> ApiResult<TaskFilter> {
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(ApiError::BadRequest(format!(
                    "limit must be a positive integer, got {}",
                    limit
                )));
            }
        }

        Ok(TaskFilter {
            done: self.done,
            limit: self.limit,
        })
    }
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

/// Completion acknowledgement
///
/// Never carries `completed_at`; that stamp is written later.
#[derive(Debug, Serialize)]
pub struct CompleteTaskResponse {
    pub message: String,
    pub task_id: Uuid,
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Create task
///
/// # Request Body
///
/// ```json
/// { "task": "Write report", "done": false }
/// ```
///
/// # Response
///
/// `201 Created` with the stored task. `status_log` is still `null`; the
/// creation stamp is applied in the background.
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.stores.tasks.insert_task(req).await?;

    tracing::info!(task_id = %task.id, "Task created");

    state
        .side_effects
        .enqueue(SideEffect::StampCreated { task_id: task.id });

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks
///
/// # Errors
///
/// - `400 Bad Request`: `done` is not a boolean or `limit` is not a positive integer
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let tasks = state.stores.tasks.list_tasks(query.into_filter()?).await?;
    Ok(Json(tasks))
}

/// Get task
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: Task not found
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id)?;

    let task = state
        .stores
        .tasks
        .find_task(id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Replace task
///
/// `completed_at` and `status_log` are kept as they are.
pub async fn replace_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateTask>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id)?;

    let task = state
        .stores
        .tasks
        .replace_task(id, req)
        .await?
        .ok_or_else(task_not_found)?;

    tracing::info!(task_id = %task.id, "Task replaced");

    Ok(Json(task))
}

/// Patch task
///
/// Applies only the fields present in the body. An empty body returns the
/// task unchanged.
pub async fn patch_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id)?;

    let patched = if req.is_empty() {
        state.stores.tasks.find_task(id).await?
    } else {
        state.stores.tasks.patch_task(id, req).await?
    };
    let task = patched.ok_or_else(task_not_found)?;

    tracing::debug!(task_id = %task.id, "Task patched");

    Ok(Json(task))
}

/// Delete task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let id = parse_id(&id)?;

    if !state.stores.tasks.delete_task(id).await? {
        return Err(task_not_found());
    }

    tracing::info!(task_id = %id, "Task deleted");

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Mark task done
///
/// # Response
///
/// ```json
/// { "message": "Task marked as completed", "task_id": "..." }
/// ```
///
/// `completed_at` is stamped by the background worker after the configured
/// delay.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: Task not found
pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CompleteTaskResponse>> {
    let id = parse_id(&id)?;

    let task = state
        .stores
        .tasks
        .mark_task_done(id)
        .await?
        .ok_or_else(task_not_found)?;

    tracing::info!(task_id = %task.id, "Task marked as completed");

    state
        .side_effects
        .enqueue(SideEffect::StampCompleted { task_id: task.id });

    Ok(Json(CompleteTaskResponse {
        message: "Task marked as completed".to_string(),
        task_id: task.id,
    }))
}
