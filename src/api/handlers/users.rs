//! User management API handlers
//!
//! All routes require a valid token with the Administrator role; the role
//! gate lives in the router middleware stack.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::auth::hash_password;
use crate::infrastructure::database::entities::user::{self, UserRole, UserStatus};
use crate::infrastructure::database::repositories::Collections;

/// State for user management handlers
#[derive(Clone)]
pub struct UsersHandlerState {
    pub collections: Collections,
}

/// User list entry (public-safe, no password hash)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    /// RFC 3339 timestamp of the last login, or `"Never"`
    pub last_login: String,
}

/// Create user request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Jane Operator",
    "username": "jane",
    "email": "jane@example.com",
    "password": "secret123",
    "role": "Operator",
    "status": "Active"
}))]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `Administrator`, `Operator` or `Viewer`
    pub role: Option<String>,
    /// `Active` or `Inactive`
    pub status: Option<String>,
}

/// Created user response
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

/// Acknowledgement response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List all users
///
/// Returns public-safe summaries; password hashes are never included.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "List of users", body = Vec<UserListItem>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn list_users(
    State(state): State<UsersHandlerState>,
) -> Result<Json<Vec<UserListItem>>, ApiError> {
    let users = state.collections.users.find_all().await?;

    let response: Vec<UserListItem> = users
        .into_iter()
        .map(|u| UserListItem {
            id: u.id,
            name: u.name,
            username: u.username,
            email: u.email,
            role: u.role.as_str().to_string(),
            status: u.status.as_str().to_string(),
            last_login: u
                .last_login
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "Never".to_string()),
        })
        .collect();

    Ok(Json(response))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedUserResponse),
        (status = 400, description = "Missing field or username already exists"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn create_user(
    State(state): State<UsersHandlerState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let (Some(name), Some(username), Some(email), Some(password), Some(role), Some(status)) = (
        request.name,
        request.username,
        request.email,
        request.password,
        request.role,
        request.status,
    ) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let role = UserRole::parse(&role)
        .ok_or_else(|| ApiError::Validation("Invalid role".to_string()))?;
    let status = UserStatus::parse(&status)
        .ok_or_else(|| ApiError::Validation("Invalid status".to_string()))?;

    // Check if username already exists
    let existing = state
        .collections
        .users
        .find_one_where(user::Column::Username.eq(&username))
        .await?;

    if existing.is_some() {
        return Err(ApiError::Validation("Username already exists".to_string()));
    }

    let password_hash = hash_password(&password)?;

    let new_user = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name),
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role),
        status: Set(status),
        created_at: Set(Utc::now()),
        last_login: Set(None),
    };

    let created = state.collections.users.insert(new_user).await?;
    info!("User '{}' created", created.username);

    let response = CreatedUserResponse {
        id: created.id,
        name: created.name,
        username: created.username,
        email: created.email,
        role: created.role.as_str().to_string(),
        status: created.status.as_str().to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = state.collections.users.find_by_id(id.clone()).await?;

    if user.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    state.collections.users.delete_by_id(id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
