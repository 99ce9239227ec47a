//! Role and permission gating
//!
//! Roles are coarse-grained (`admin`, `user`) and carried in the token;
//! permissions are fine-grained capabilities resolved from the role via a
//! static table. The table is code, not configuration: there is no dynamic
//! authorization store in this system.
//!
//! Both gates fail closed. A request that reaches a gate without an
//! identity context is a wiring defect (the gate must run after token
//! verification) and is rejected with 403 rather than let through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::error::ApiError;

/// Coarse-grained access category carried in token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Static role → permission table
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Admin => &[
                Permission::Read,
                Permission::Write,
                Permission::Delete,
                Permission::Manage,
            ],
            Role::User => &[Permission::Read],
        }
    }

    pub fn has_permission(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    /// Unknown role strings are an error, not a default: a credential
    /// record with an unrecognized role grants nothing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => anyhow::bail!("unknown role: {other}"),
        }
    }
}

/// Fine-grained capability resolved from a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
    Write,
    Delete,
    Manage,
}

/// Pass when the caller's role is in `allowed`, otherwise 403
///
/// `user` is `None` when no identity context was populated for the
/// request; that case also fails closed.
pub fn require_role(user: Option<&AuthUser>, allowed: &[Role]) -> Result<(), ApiError> {
    let user = user.ok_or_else(|| {
        ApiError::Forbidden("Access denied: role not specified".to_string())
    })?;
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Access denied: role not authorized".to_string(),
        ))
    }
}

/// Pass when the caller's role grants `permission`, otherwise 403
pub fn require_permission(
    user: Option<&AuthUser>,
    permission: Permission,
) -> Result<(), ApiError> {
    let user = user.ok_or_else(|| {
        ApiError::Forbidden("Access denied: role not specified".to_string())
    })?;
    if user.role.has_permission(permission) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Access denied: missing permission".to_string(),
        ))
    }
}
