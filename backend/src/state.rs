//! Application state management
//!
//! The credential store is injected here as a trait object rather than a
//! bare pool handle: the host process owns the connect → serve → shutdown
//! lifecycle, and nothing reads the store before it is ready.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::CredentialStore;
use anyhow::Result;
use std::sync::Arc;

/// Shared application state
///
/// All fields are cheap to clone across async tasks: the store and config
/// are behind Arc, and the JWT service holds Arc'd pre-computed keys.
/// State is immutable after creation.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn CredentialStore>,
    config: Arc<AppConfig>,
    jwt: JwtService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when the JWT secret is empty; the caller treats that as
    /// startup-fatal.
    pub fn new(store: Arc<dyn CredentialStore>, config: AppConfig) -> Result<Self> {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_ttl_secs)?;

        Ok(Self {
            store,
            config: Arc::new(config),
            jwt,
        })
    }

    /// Get the credential store
    #[inline]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
