//! JWT token issuance and verification
//!
//! Tokens are self-contained: claims carry the subject id, email and role,
//! and validity is purely a function of (token, secret, current time).
//! There is no server-side token store and no revocation; a token means
//! the same thing for its whole 24-hour life.
//!
//! Keys are pre-computed once at startup and cached in AppState; deriving
//! them per request would be wasted work.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::rbac::Role;
use crate::error::ApiError;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Verification failure, kept distinct so the middleware can answer with
/// different messages for an expired versus a tampered/garbage token
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Malformed => ApiError::InvalidToken,
        }
    }
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

/// JWT service for token operations
///
/// Create once at application startup and store in AppState; cloning is
/// cheap because the keys are wrapped in Arc.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    token_ttl_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// An empty secret is rejected here so that a misconfigured process
    /// fails at startup instead of failing every login.
    pub fn new(secret: &str, token_ttl_secs: i64) -> Result<Self> {
        if secret.trim().is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }
        Ok(Self {
            keys: JwtKeys {
                encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
                decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            },
            token_ttl_secs,
        })
    }

    /// Sign a token for the given identity with the configured TTL
    pub fn issue(&self, user_id: Uuid, email: &str, role: Role) -> Result<String> {
        self.issue_with_ttl(user_id, email, role, self.token_ttl_secs)
    }

    /// Sign a token with an explicit TTL (negative values produce an
    /// already-expired token; used by expiry tests)
    pub(crate) fn issue_with_ttl(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        ttl_secs: i64,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Verify a token and return its claims
    ///
    /// Pure computation: signature check plus expiry comparison, with zero
    /// leeway so the expiry boundary is exact.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }

    /// Configured token lifetime in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }
}
