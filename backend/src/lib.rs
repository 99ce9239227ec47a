//! Vet Clinic API Backend Library
//!
//! Authentication and authorization core for the clinic management API.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: login flow and user provisioning
//! - Repositories: credential store behind a trait, injected at startup
//! - Auth: token codec, password hashing, extractors, role/permission gates

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
