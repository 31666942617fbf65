/// User management endpoints
///
/// # Endpoints
///
/// - `POST /users` - Create user
/// - `GET /users` - List users
/// - `GET /users/:id` - Get user
/// - `PUT /users/:id` - Replace user
/// - `DELETE /users/:id` - Delete user
///
/// # User Payload
///
/// ```json
/// {
///   "name": "John Doe",
///   "email": "john@example.com",
///   "age": 30,
///   "role": "admin",
///   "salary": 85000.0,
///   "department": "Engineering",
///   "is_active": true
/// }
/// ```
///
/// `name` and `email` are required. `role` defaults to `user` and
/// `is_active` to `true`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{parse_id, ValidatedJson},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use roster_shared::models::user::{CreateUser, User};
use serde::Serialize;

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: String,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// Create user
///
/// # Response
///
/// `201 Created` with the stored user, including its `id`, `created_at`
/// and defaulted fields.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, validation failed or email already registered
/// - `500 Internal Server Error`: Store error
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.stores.users.insert_user(req).await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// List users in insertion order
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.stores.users.list_users().await?;
    Ok(Json(users))
}

/// Get user
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: User not found
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id)?;

    let user = state
        .stores
        .users
        .find_user(id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user))
}

/// Replace user
///
/// Replaces every mutable field with the payload; `created_at` is kept.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID or body, validation failed or email taken
/// - `404 Not Found`: User not found
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateUser>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id)?;

    let user = state
        .stores
        .users
        .replace_user(id, req)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %user.id, "User replaced");

    Ok(Json(user))
}

/// Delete user
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: User not found
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteUserResponse>> {
    let id = parse_id(&id)?;

    if !state.stores.users.delete_user(id).await? {
        return Err(user_not_found());
    }

    tracing::info!(user_id = %id, "User deleted");

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully".to_string(),
    }))
}
