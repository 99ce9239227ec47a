//! Token verification middleware
//!
//! The [`AuthUser`] extractor is the single implementation of the bearer
//! token check: header present, `Bearer ` scheme, signature and expiry via
//! the token codec, then a request-scoped identity context. Every
//! protected route goes through it; there are no per-route variants.
//!
//! [`ActiveUser`] is the strict form used where a valid token is not
//! enough: it re-checks the credential store so that deleting or
//! deactivating an account takes effect immediately even though issued
//! tokens cannot be revoked.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::auth::rbac::Role;
use crate::error::ApiError;
use crate::repositories::AccountStatus;
use crate::state::AppState;

/// Request-scoped identity context populated from verified token claims
///
/// Owned by the current request; dropped when the request completes.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Pull the bearer token out of the Authorization header
///
/// Absence and a wrong scheme are distinct errors; neither is treated as
/// an anonymous request.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(ApiError::MissingToken)?;

    let header = header.to_str().map_err(|_| ApiError::MalformedToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::MalformedToken)?;

    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    Ok(token)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts)?;
        let claims = app_state.jwt().verify(token)?;

        let user = AuthUser::from(claims);
        debug!(email = %user.email, "request authenticated");
        Ok(user)
    }
}

/// Identity context with a credential store re-check
///
/// The wrapped [`AuthUser`] is rebuilt from the stored record, so the
/// email and role reflect the database, not possibly-stale claims. A
/// missing or inactive account is rejected with 401 even though the token
/// itself verified; an unreachable store is a 500, never an auth failure.
#[derive(Debug, Clone)]
pub struct ActiveUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ActiveUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let record = app_state
            .store()
            .find_by_id(user.user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        if record.status == AccountStatus::Inactive {
            return Err(ApiError::Unauthorized("Account disabled".to_string()));
        }

        Ok(ActiveUser(AuthUser {
            user_id: record.id,
            email: record.email,
            role: record.role,
        }))
    }
}
