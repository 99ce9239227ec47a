//! Credential store
//!
//! The auth core never touches a connection handle directly; it is handed
//! a [`CredentialStore`] at construction. [`PgCredentialStore`] is the
//! production implementation; tests use the in-memory variant so the full
//! login and gating flows run without a database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account status; inactive accounts fail login and the strict
/// verification re-check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => anyhow::bail!("unknown account status: {other}"),
        }
    }
}

/// Stored credential record
///
/// `password_hash` stays inside the auth core; it is never serialized
/// into a response or written to a log.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a credential record
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
}

/// Read/write access to credential records
///
/// Lookups are the only I/O the auth core performs; implementations must
/// bound their own timeouts so an unavailable store surfaces as an error
/// instead of a hang.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact-match lookup; callers pass the email already lower-cased
    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialRecord>>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord>;

    async fn list(&self) -> Result<Vec<CredentialRecord>>;

    /// Cheap connectivity probe for the readiness endpoint
    async fn ping(&self) -> Result<()>;
}

/// PostgreSQL-backed credential store
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Raw row; role and status come back as text and are validated on the
/// way out so a corrupt record fails loudly instead of granting access
#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for CredentialRecord {
    type Error = anyhow::Error;

    fn try_from(row: CredentialRow) -> Result<Self> {
        Ok(CredentialRecord {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, email, password_hash, role, status, created_at, updated_at
            FROM credentials
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialRecord>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, email, password_hash, role, status, created_at, updated_at
            FROM credentials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM credentials WHERE LOWER(email) = LOWER($1))
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            INSERT INTO credentials (email, password_hash, role, status)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING id, email, password_hash, role, status, created_at, updated_at
            "#,
        )
        .bind(&credential.email)
        .bind(&credential.password_hash)
        .bind(credential.role.as_str())
        .bind(credential.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list(&self) -> Result<Vec<CredentialRecord>> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, email, password_hash, role, status, created_at, updated_at
            FROM credentials
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(CredentialRecord::try_from)
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_status_round_trips_as_text() {
        assert_eq!("active".parse::<AccountStatus>().unwrap(), AccountStatus::Active);
        assert_eq!(
            "inactive".parse::<AccountStatus>().unwrap(),
            AccountStatus::Inactive
        );
        assert!("suspended".parse::<AccountStatus>().is_err());
        assert_eq!(AccountStatus::Active.as_str(), "active");
    }

    #[test]
    fn corrupt_role_in_row_is_an_error() {
        let row = CredentialRow {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            role: "superuser".to_string(),
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(CredentialRecord::try_from(row).is_err());
    }
}
