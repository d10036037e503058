//! Authentication API handlers

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use sea_orm::{ColumnTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::{create_token, verify_password, JwtConfig};
use crate::infrastructure::database::entities::user;
use crate::infrastructure::database::repositories::Collections;

/// State for authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub collections: Collections,
    pub jwt_config: JwtConfig,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "username": "admin",
    "password": "admin123"
}))]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// Successful login response
///
/// The token is passed on subsequent requests in the
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed JWT access token, valid for 24 hours
    pub token: String,
    /// Public-safe user summary
    pub user: UserSummary,
}

/// Public-safe user summary (never contains the password hash)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    /// Unique user identifier
    pub id: String,
    /// Username
    pub username: String,
    /// Role: `Administrator`, `Operator` or `Viewer`
    pub role: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

impl UserSummary {
    fn from_model(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Authenticate a user
///
/// Verifies the credentials against the stored hash and returns a signed
/// bearer token. Updates the user's last-login timestamp on every
/// successful attempt.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, returns token and user summary", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Find user by username
    let user = state
        .collections
        .users
        .find_one_where(user::Column::Username.eq(&request.username))
        .await?;

    let Some(user) = user else {
        warn!("Login failed: unknown user '{}'", request.username);
        return Err(ApiError::InvalidCredentials);
    };

    // Verify password
    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        warn!("Login failed: invalid password for '{}'", request.username);
        return Err(ApiError::InvalidCredentials);
    }

    // Update last login time
    let mut active_user: user::ActiveModel = user.clone().into();
    active_user.last_login = Set(Some(Utc::now()));
    state.collections.users.update(active_user).await.ok();

    let token = create_token(
        &user.id,
        &user.username,
        user.role.as_str(),
        &state.jwt_config,
    )?;

    info!("Login successful for '{}'", user.username);

    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from_model(&user),
    }))
}

/// Get the current user
///
/// Re-resolves the user behind the presented token. Returns 404 when the
/// account was deleted after the token was issued; role or status changes
/// after issuance are not re-checked.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user summary", body = UserSummary),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserSummary>, ApiError> {
    let db_user = state
        .collections
        .users
        .find_by_id(user.user_id.clone())
        .await?;

    let Some(db_user) = db_user else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    Ok(Json(UserSummary::from_model(&db_user)))
}
