//! User account management
//!
//! Thin provisioning operations behind the `manage` permission; the heavy
//! lifting (hashing, uniqueness) reuses the auth core.

use serde::Serialize;
use tracing::info;
use validator::ValidateEmail;

use crate::auth::{PasswordService, Role};
use crate::error::ApiError;
use crate::repositories::{AccountStatus, CredentialRecord, CredentialStore, NewCredential};
use crate::services::auth::MIN_PASSWORD_LEN;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Credential record minus the password hash
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl From<CredentialRecord> for UserSummary {
    fn from(record: CredentialRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            role: record.role,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// User provisioning service
pub struct UserService;

impl UserService {
    /// Create a credential record
    ///
    /// # Performance
    /// Password hashing is offloaded to the blocking thread pool.
    pub async fn create(
        store: &dyn CredentialStore,
        email: &str,
        password: &str,
        role: Role,
        status: AccountStatus,
    ) -> Result<UserSummary, ApiError> {
        let email = email.trim();

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

        if store
            .email_exists(&email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let record = store
            .insert(NewCredential {
                email,
                password_hash,
                role,
                status,
            })
            .await
            .map_err(ApiError::Internal)?;

        info!(email = %record.email, role = %record.role, "user created");

        Ok(record.into())
    }

    /// List all credential records without their hashes
    pub async fn list(store: &dyn CredentialStore) -> Result<Vec<UserSummary>, ApiError> {
        let records = store.list().await.map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(UserSummary::from).collect())
    }
}
