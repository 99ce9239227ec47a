//! Password hashing using bcrypt
//!
//! Cost factor 10 matches the existing credential corpus; every hash gets
//! a fresh salt from the library.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. Async callers should use the
//! `*_async` variants, which run the work on the blocking thread pool.

use anyhow::Result;
use bcrypt::BcryptError;

/// bcrypt work factor for newly created hashes
pub const BCRYPT_COST: u32 = 10;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using bcrypt (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A hash that does not parse counts as a mismatch rather than an
    /// error: verification answers "does this password match", and a
    /// corrupt stored hash cannot match anything. Only I/O-level library
    /// failures propagate.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        match bcrypt::verify(password, hash) {
            Ok(valid) => Ok(valid),
            Err(BcryptError::Io(e)) => Err(anyhow::anyhow!("bcrypt I/O error: {}", e)),
            Err(_) => Ok(false),
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}
