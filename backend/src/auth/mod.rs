//! Authentication and authorization core
//!
//! Provides JWT issuance/verification, bcrypt password hashing, the
//! bearer-token extractors and the role/permission gates.

mod jwt;
mod middleware;
mod password;
mod rbac;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{ActiveUser, AuthUser};
pub use password::{PasswordService, BCRYPT_COST};
pub use rbac::{require_permission, require_role, Permission, Role};
