//! Data access layer
//!
//! Exposes the credential store abstraction consumed by the auth core.

pub mod credentials;

pub use credentials::{
    AccountStatus, CredentialRecord, CredentialStore, NewCredential, PgCredentialStore,
};
