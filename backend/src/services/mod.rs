//! Business logic services
//!
//! Services encapsulate the auth core's flows and coordinate between the
//! credential store and the token codec.

pub mod auth;
pub mod users;

pub use auth::AuthService;
pub use users::UserService;
