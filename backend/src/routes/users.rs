//! User management routes
//!
//! Account provisioning for operators. Creation needs the `manage`
//! permission; listing is admin-only. Both run the strict store re-check
//! before the gate so a revoked admin cannot keep using an old token.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::auth::{require_permission, require_role, ActiveUser, Permission, Role};
use crate::error::ApiResult;
use crate::repositories::AccountStatus;
use crate::response::ApiResponse;
use crate::services::users::{UserService, UserSummary};
use crate::state::AppState;

/// Create user management routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", post(create_user).get(list_users))
}

/// User creation request body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

/// Create a credential record
///
/// POST /api/v1/users (requires `manage`)
async fn create_user(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserSummary>>)> {
    require_permission(Some(&user), Permission::Manage)?;

    let created = UserService::create(
        state.store(),
        &req.email,
        &req.password,
        req.role.unwrap_or(Role::User),
        req.status.unwrap_or(AccountStatus::Active),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created", created)),
    ))
}

/// List credential records without hashes
///
/// GET /api/v1/users (requires `admin` role)
async fn list_users(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
) -> ApiResult<Json<ApiResponse<Vec<UserSummary>>>> {
    require_role(Some(&user), &[Role::Admin])?;

    let users = UserService::list(state.store()).await?;
    Ok(Json(ApiResponse::ok("Users retrieved", users)))
}
