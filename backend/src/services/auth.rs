//! Login flow
//!
//! Orchestrates credential check → token issuance. The single invariant
//! worth re-reading here: an unknown email and a wrong password must be
//! indistinguishable in the response, so both paths return the same
//! [`ApiError::InvalidCredentials`]. Outcomes are logged with the email
//! only, never the password.

use tracing::{info, warn};
use validator::ValidateEmail;

use crate::auth::{JwtService, PasswordService, Role};
use crate::error::ApiError;
use crate::repositories::{AccountStatus, CredentialStore};
use serde::Serialize;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Client-visible slice of a credential record
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub email: String,
    pub role: Role,
}

/// Successful login payload
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: PublicUser,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Authenticate an email/password pair and issue a token
    ///
    /// # Performance
    /// Password verification is offloaded to the blocking thread pool.
    pub async fn login(
        store: &dyn CredentialStore,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<LoginData, ApiError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let email = email.to_lowercase();

        let record = store
            .find_by_email(&email)
            .await
            .map_err(ApiError::Internal)?;

        let Some(record) = record else {
            warn!(email = %email, "login failed: unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        if record.status == AccountStatus::Inactive {
            warn!(email = %email, "login failed: account inactive");
            return Err(ApiError::InvalidCredentials);
        }

        let valid = PasswordService::verify_async(
            password.to_string(),
            record.password_hash.clone(),
        )
        .await
        .map_err(ApiError::Internal)?;

        if !valid {
            warn!(email = %email, "login failed: wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = jwt
            .issue(record.id, &record.email, record.role)
            .map_err(ApiError::Internal)?;

        info!(email = %record.email, "login succeeded");

        Ok(LoginData {
            token,
            user: PublicUser {
                email: record.email,
                role: record.role,
            },
        })
    }
}
