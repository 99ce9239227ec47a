//! Authentication routes
//!
//! `POST /auth/login` and `GET /auth/verify`. Verification here is the
//! strict form: the subject is re-checked against the credential store so
//! a deleted or deactivated account is rejected even with a valid token.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::ActiveUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::services::auth::{AuthService, LoginData, PublicUser};
use crate::state::AppState;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/verify", get(verify))
}

/// Login request body
///
/// Fields default to empty so that an absent field reaches the
/// validation step and gets a 400 instead of a body-rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Payload for `GET /auth/verify`
#[derive(Debug, Serialize)]
pub struct VerifyData {
    pub user: PublicUser,
}

/// Login with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginData>>> {
    let data = AuthService::login(state.store(), state.jwt(), &req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok("Login successful", data)))
}

/// Verify the caller's token and echo its identity
///
/// GET /api/v1/auth/verify
async fn verify(ActiveUser(user): ActiveUser) -> Json<ApiResponse<VerifyData>> {
    Json(ApiResponse::ok(
        "Token valid",
        VerifyData {
            user: PublicUser {
                email: user.email,
                role: user.role,
            },
        },
    ))
}
